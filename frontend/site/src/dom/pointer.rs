use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, EventTarget, HtmlElement, MouseEvent};

use super::util::{self, register_events, Holder};
use crate::pointer::{card_icon_transform, Cursor, Point, OUTLINE_DELAY_MS};

struct CursorElements {
	cursor: RefCell<Cursor>,
	dot: HtmlElement,
	outline: HtmlElement,
}

fn place(element: &HtmlElement, point: Point) -> Result<(), JsValue> {
	element.style().set_property("left", &point.left())?;
	element.style().set_property("top", &point.top())
}

impl CursorElements {
	fn moved(&self, x: f64, y: f64) -> Result<(), JsValue> {
		let dot = self.cursor.borrow_mut().moved(x, y);
		place(&self.dot, dot)?;
		self.show()
	}

	fn show(&self) -> Result<(), JsValue> {
		let opacity = self.cursor.borrow().opacity();
		self.dot.style().set_property("opacity", opacity)?;
		self.outline.style().set_property("opacity", opacity)
	}
}

async fn trail(elements: Weak<CursorElements>) {
	TimeoutFuture::new(OUTLINE_DELAY_MS).await;

	// Gone once the view is dropped.
	let Some(elements) = elements.upgrade() else {
		return;
	};

	let outline = elements.cursor.borrow_mut().catch_up();
	if let Err(err) = place(&elements.outline, outline) {
		tracing::warn!(error = ?err, "failed to move cursor outline");
	}
}

pub struct CursorView {
	_events: Holder<EventTarget>,
}

impl CursorView {
	pub fn mount(document: &Document) -> Result<Option<Self>, JsValue> {
		let (Some(dot), Some(outline)) = (
			util::query::<HtmlElement>(document, ".cursor-dot")?,
			util::query::<HtmlElement>(document, ".cursor-outline")?,
		) else {
			return Ok(None);
		};

		let elements = Rc::new(CursorElements {
			cursor: RefCell::new(Cursor::default()),
			dot,
			outline,
		});

		let cleanup = register_events!(document, {
			"mousemove" => {
				let elements = elements.clone();
				move |event: web_sys::Event| {
					let Some(event) = event.dyn_ref::<MouseEvent>() else {
						return;
					};

					if let Err(err) = elements.moved(event.client_x() as f64, event.client_y() as f64) {
						tracing::warn!(error = ?err, "failed to move cursor");
						return;
					}

					wasm_bindgen_futures::spawn_local(trail(Rc::downgrade(&elements)));
				}
			},
			"mouseleave" => {
				let elements = elements.clone();
				move |_| {
					elements.cursor.borrow_mut().left_page();
					elements.show().ok();
				}
			},
		})?;

		Ok(Some(Self {
			_events: Holder::new(document.clone().unchecked_into(), cleanup),
		}))
	}
}

/// Tilts the icon of a contact card while it is hovered.
pub struct CardHoverView {
	_events: Vec<Holder<EventTarget>>,
}

impl CardHoverView {
	pub fn mount(document: &Document) -> Result<Self, JsValue> {
		let mut events = Vec::new();

		for card in util::query_all::<HtmlElement>(document, ".contact-card")? {
			let Some(icon) = card
				.query_selector(".contact-icon i")?
				.and_then(|icon| icon.dyn_into::<HtmlElement>().ok())
			else {
				continue;
			};

			let cleanup = register_events!(card, {
				"mouseenter" => {
					let icon = icon.clone();
					move |_| {
						icon.style().set_property("transform", card_icon_transform(true)).ok();
					}
				},
				"mouseleave" => move |_| {
					icon.style().set_property("transform", card_icon_transform(false)).ok();
				},
			})?;
			events.push(Holder::new(card.unchecked_into(), cleanup));
		}

		Ok(Self { _events: events })
	}
}

/// Fades the body in once the page has loaded.
pub struct PageLoadView {
	_events: Holder<EventTarget>,
}

impl PageLoadView {
	pub fn mount(document: &Document) -> Result<Option<Self>, JsValue> {
		let Some(body) = document.body() else {
			return Ok(None);
		};

		let fade_in = move || {
			body.style().set_property("opacity", "1").ok();
		};

		// The site can mount after `load` has already fired.
		if document.ready_state() == "complete" {
			fade_in();
			return Ok(None);
		}

		let window = util::window()?;
		let cleanup = register_events!(window, {
			"load" => move |_| fade_in(),
		})?;

		Ok(Some(Self {
			_events: Holder::new(window.unchecked_into(), cleanup),
		}))
	}
}
