use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
	Document, Element, EventTarget, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
	ScrollBehavior, ScrollToOptions,
};

use super::util::{self, register_events, Holder};
use crate::scroll::{nav_target, scroll_progress, scroll_to_top_visible, HeaderStyle, RevealTracker};

fn smooth_scroll(top: f64) -> Result<(), JsValue> {
	let options = ScrollToOptions::new();
	options.set_top(top);
	options.set_behavior(ScrollBehavior::Smooth);
	util::window()?.scroll_to_with_scroll_to_options(&options);
	Ok(())
}

struct Indicators {
	progress: HtmlElement,
	header: Option<HtmlElement>,
	to_top: Option<HtmlElement>,
}

impl Indicators {
	fn update(&self) -> Result<(), JsValue> {
		let window = util::window()?;
		let scroll_y = window.scroll_y()?;
		let viewport = window.inner_height()?.as_f64().unwrap_or_default();
		let document_height = util::document()?
			.document_element()
			.map(|root| root.scroll_height() as f64)
			.unwrap_or_default();

		self.progress
			.style()
			.set_property("width", &format!("{}%", scroll_progress(scroll_y, document_height, viewport)))?;

		if let Some(header) = &self.header {
			let style = HeaderStyle::for_scroll(scroll_y);
			header.style().set_property("box-shadow", style.box_shadow())?;
			header.style().set_property("background", style.background())?;
		}

		if let Some(to_top) = &self.to_top {
			to_top.class_list().toggle_with_force("visible", scroll_to_top_visible(scroll_y))?;
		}

		Ok(())
	}
}

struct Reveal {
	observer: IntersectionObserver,
	_callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Drop for Reveal {
	fn drop(&mut self) {
		self.observer.disconnect();
	}
}

pub struct ScrollView {
	_events: Vec<Holder<EventTarget>>,
	_reveal: Option<Reveal>,
	progress: HtmlElement,
}

impl Drop for ScrollView {
	fn drop(&mut self) {
		self.progress.remove();
	}
}

impl ScrollView {
	pub fn mount(document: &Document) -> Result<Self, JsValue> {
		let progress: HtmlElement = document.create_element("div")?.dyn_into()?;
		progress.set_class_name("scroll-progress");
		if let Some(body) = document.body() {
			body.append_child(&progress)?;
		}

		let indicators = Rc::new(Indicators {
			progress: progress.clone(),
			header: util::query(document, "header")?,
			to_top: util::query(document, ".scroll-to-top")?,
		});
		indicators.update()?;

		let mut events = Vec::new();

		let window = util::window()?;
		let cleanup = register_events!(window, {
			"scroll" => {
				let indicators = indicators.clone();
				move |_| {
					if let Err(err) = indicators.update() {
						tracing::warn!(error = ?err, "failed to update scroll indicators");
					}
				}
			},
		})?;
		events.push(Holder::new(window.unchecked_into(), cleanup));

		if let Some(to_top) = &indicators.to_top {
			let cleanup = register_events!(to_top, {
				"click" => move |_| {
					smooth_scroll(0.0).ok();
				},
			})?;
			events.push(Holder::new(to_top.clone().unchecked_into(), cleanup));
		}

		for link in util::query_all::<Element>(document, "nav a[href^=\"#\"]")? {
			let document = document.clone();
			let cleanup = register_events!(link, {
				"click" => {
					let link = link.clone();
					move |event: web_sys::Event| {
						let Some(target) = link
							.get_attribute("href")
							.and_then(|href| document.query_selector(&href).ok().flatten())
							.and_then(|target| target.dyn_into::<HtmlElement>().ok())
						else {
							return;
						};

						event.prevent_default();
						smooth_scroll(nav_target(target.offset_top() as f64)).ok();
					}
				},
			})?;
			events.push(Holder::new(link.unchecked_into(), cleanup));
		}

		Ok(Self {
			_events: events,
			_reveal: Self::reveal(document)?,
			progress,
		})
	}

	/// Adds `visible` to each section the first time it scrolls into view.
	fn reveal(document: &Document) -> Result<Option<Reveal>, JsValue> {
		let sections = util::query_all::<Element>(document, "section")?;
		if sections.is_empty() {
			return Ok(None);
		}

		let tracker = RefCell::new(RevealTracker::default());
		let targets = sections.clone();
		let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
			move |entries: js_sys::Array, observer: IntersectionObserver| {
				for entry in entries.iter().filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok()) {
					let target = entry.target();
					let Some(index) = targets.iter().position(|section| *section == target) else {
						continue;
					};

					if tracker.borrow_mut().observe(index, entry.is_intersecting()) {
						target.class_list().add_1("visible").ok();
						observer.unobserve(&target);
					}
				}
			},
		);

		let options = IntersectionObserverInit::new();
		options.set_root_margin("0px 0px -50px 0px");
		options.set_threshold(&JsValue::from_f64(0.1));

		let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
		for section in &sections {
			observer.observe(section);
		}

		Ok(Some(Reveal {
			observer,
			_callback: callback,
		}))
	}
}
