use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlElement, KeyboardEvent, TouchEvent};

use super::timer::TimerLoop;
use super::util::{self, now, register_events, Holder};
use crate::carousel::Carousel;

const PAUSED_POLL: Duration = Duration::from_millis(250);

struct Elements {
	track: HtmlElement,
	cards: Vec<Element>,
	indicators: Vec<Element>,
}

impl Elements {
	fn render(&self, index: usize, offset_percent: f64) {
		self.track
			.style()
			.set_property("transform", &format!("translateX({offset_percent}%)"))
			.ok();

		for elements in [&self.cards, &self.indicators] {
			for (i, element) in elements.iter().enumerate() {
				element.class_list().toggle_with_force("active", i == index).ok();
			}
		}
	}
}

pub struct CarouselView {
	_timer: TimerLoop,
	_events: Vec<Holder<EventTarget>>,
}

type Shared = Rc<(RefCell<Carousel>, Elements)>;

fn apply(shared: &Shared, moved: Option<usize>) {
	if let Some(index) = moved {
		let carousel = shared.0.borrow();
		shared.1.render(index, carousel.offset_percent());
		tracing::debug!(index, "carousel moved");
	}
}

impl CarouselView {
	pub fn mount(document: &Document) -> Result<Option<Self>, JsValue> {
		let Some(track) = util::query::<HtmlElement>(document, ".carousel-track")? else {
			return Ok(None);
		};

		let elements = Elements {
			cards: util::query_all_in(&track, ".project-card")?,
			indicators: util::query_all(document, ".indicator")?,
			track: track.clone(),
		};

		let shared: Shared = Rc::new((RefCell::new(Carousel::new(elements.cards.len(), now())), elements));
		apply(&shared, shared.0.borrow().refresh());

		let mut events = Vec::new();

		for (selector, forward) in [(".prev-btn", false), (".next-btn", true)] {
			if let Some(button) = util::query::<HtmlElement>(document, selector)? {
				let shared = shared.clone();
				let cleanup = register_events!(button, {
					"click" => move |_| {
						let moved = {
							let mut carousel = shared.0.borrow_mut();
							if forward { carousel.next(now()) } else { carousel.prev(now()) }
						};
						apply(&shared, moved);
					},
				})?;
				events.push(Holder::new(button.unchecked_into(), cleanup));
			}
		}

		for (index, indicator) in shared.1.indicators.iter().enumerate() {
			let shared = shared.clone();
			let cleanup = register_events!(indicator, {
				"click" => move |_| {
					let moved = shared.0.borrow_mut().go_to(index, now());
					apply(&shared, moved);
				},
			})?;
			events.push(Holder::new(indicator.clone().unchecked_into(), cleanup));
		}

		let container = track.parent_element().unwrap_or_else(|| track.clone().into());
		let cleanup = register_events!(container, {
			"mouseenter" => {
				let shared = shared.clone();
				move |_| shared.0.borrow_mut().pause()
			},
			"mouseleave" => {
				let shared = shared.clone();
				move |_| shared.0.borrow_mut().resume(now())
			},
			"touchstart" => {
				let shared = shared.clone();
				move |event: web_sys::Event| {
					if let Some(touch) = event.dyn_ref::<TouchEvent>().and_then(|event| event.changed_touches().get(0)) {
						shared.0.borrow_mut().touch_start(touch.screen_x() as f64);
					}
				}
			},
			"touchend" => {
				let shared = shared.clone();
				move |event: web_sys::Event| {
					if let Some(touch) = event.dyn_ref::<TouchEvent>().and_then(|event| event.changed_touches().get(0)) {
						let moved = shared.0.borrow_mut().touch_end(touch.screen_x() as f64, now());
						apply(&shared, moved);
					}
				}
			},
		})?;
		events.push(Holder::new(container.unchecked_into(), cleanup));

		let cleanup = register_events!(document, {
			"keydown" => {
				let shared = shared.clone();
				move |event: web_sys::Event| {
					if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
						let moved = shared.0.borrow_mut().key(&event.key(), now());
						apply(&shared, moved);
					}
				}
			},
		})?;
		events.push(Holder::new(document.clone().unchecked_into(), cleanup));

		let window = util::window()?;
		let cleanup = register_events!(window, {
			"resize" => {
				let shared = shared.clone();
				move |_| {
					let current = shared.0.borrow().refresh();
					apply(&shared, current);
				}
			},
		})?;
		events.push(Holder::new(window.unchecked_into(), cleanup));

		let slides = shared.1.cards.len();
		let timer = TimerLoop::spawn(move || {
			let moved = shared.0.borrow_mut().tick(now());
			apply(&shared, moved);

			shared.0
				.borrow()
				.until_next_advance(now())
				.map(|ms| Duration::from_millis(ms.ceil() as u64))
				.unwrap_or(PAUSED_POLL)
		});

		tracing::debug!(slides, "carousel mounted");

		Ok(Some(Self {
			_timer: timer,
			_events: events,
		}))
	}
}
