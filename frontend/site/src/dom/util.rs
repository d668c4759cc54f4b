use std::ops::Deref;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, NodeList, Window};

pub type Cleanup = Box<dyn FnOnce(&web_sys::EventTarget)>;

/// Keeps listeners attached to `inner` until dropped.
pub struct Holder<T: JsCast> {
	inner: T,
	cleanup: Option<Cleanup>,
}

impl<T: JsCast> Holder<T> {
	pub fn new(inner: T, cleanup: Cleanup) -> Self {
		Self {
			inner,
			cleanup: Some(cleanup),
		}
	}
}

impl<T: JsCast> Deref for Holder<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.inner
	}
}

impl<T: JsCast> Drop for Holder<T> {
	fn drop(&mut self) {
		if let Some(cleanup) = self.cleanup.take() {
			cleanup(self.inner.unchecked_ref());
		}
	}
}

/// Attaches the handlers to `$target` and evaluates to a `Result` with the
/// cleanup that detaches them again. Nothing stays attached on error.
macro_rules! register_events {
	($target:expr, {
		$(
			$($evt:literal)|+ => $body:expr
		),* $(,)?
	}) => {
		{
			let target: &web_sys::EventTarget = $target.as_ref();
			let mut handlers: Vec<(&'static [&'static str], wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>)> = Vec::new();
			$(
				handlers.push((&[$($evt),+], wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new($body)));
			)*

			let mut result = Ok(());
			for (events, handler) in &handlers {
				for event in events.iter() {
					if let Err(err) = target.add_event_listener_with_callback(event, wasm_bindgen::JsCast::unchecked_ref(handler.as_ref())) {
						result = Err(err);
					}
				}
			}

			let cleanup: $crate::dom::util::Cleanup = Box::new(move |target: &web_sys::EventTarget| {
				for (events, handler) in handlers.drain(..) {
					for event in events.iter() {
						target
							.remove_event_listener_with_callback(event, wasm_bindgen::JsCast::unchecked_ref(handler.as_ref()))
							.ok();
					}
				}
			});

			match result {
				Ok(()) => Ok(cleanup),
				Err(err) => {
					cleanup(target);
					Err::<$crate::dom::util::Cleanup, wasm_bindgen::JsValue>(err)
				}
			}
		}
	};
}

pub(crate) use register_events;

pub fn window() -> Result<Window, JsValue> {
	web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
	window()?.document().ok_or_else(|| JsValue::from_str("no document"))
}

/// Milliseconds since the page loaded.
pub fn now() -> f64 {
	web_sys::window()
		.and_then(|window| window.performance())
		.map(|performance| performance.now())
		.unwrap_or_default()
}

pub fn query<T: JsCast>(document: &Document, selector: &str) -> Result<Option<T>, JsValue> {
	Ok(document.query_selector(selector)?.and_then(|element| element.dyn_into().ok()))
}

pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>, JsValue> {
	Ok(collect(document.query_selector_all(selector)?))
}

pub fn query_all_in<T: JsCast>(parent: &Element, selector: &str) -> Result<Vec<T>, JsValue> {
	Ok(collect(parent.query_selector_all(selector)?))
}

fn collect<T: JsCast>(list: NodeList) -> Vec<T> {
	(0..list.length())
		.filter_map(|index| list.get(index))
		.filter_map(|node| node.dyn_into().ok())
		.collect()
}

pub fn viewport() -> Result<(f64, f64), JsValue> {
	let window = window()?;
	Ok((
		window.inner_width()?.as_f64().unwrap_or_default(),
		window.inner_height()?.as_f64().unwrap_or_default(),
	))
}
