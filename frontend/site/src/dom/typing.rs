use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlElement};

use super::timer::TimerLoop;
use super::util;
use crate::typing::{TypingLoop, DEFAULT_PHRASES};

pub struct TypingView {
	_timer: TimerLoop,
}

impl TypingView {
	/// Phrases come from a JSON array in `data-phrases`, falling back to the defaults.
	pub fn mount(document: &Document) -> Result<Option<Self>, JsValue> {
		let Some(element) = util::query::<HtmlElement>(document, ".typed-text")? else {
			return Ok(None);
		};

		let phrases = element
			.get_attribute("data-phrases")
			.and_then(|raw| match serde_json::from_str::<Vec<String>>(&raw) {
				Ok(phrases) => Some(phrases),
				Err(err) => {
					tracing::warn!(error = %err, "ignoring invalid data-phrases");
					None
				}
			})
			.and_then(TypingLoop::new)
			.or_else(|| TypingLoop::new(DEFAULT_PHRASES));

		let Some(mut typing) = phrases else {
			return Ok(None);
		};

		let timer = TimerLoop::spawn(move || {
			let step = typing.step();
			element.set_text_content(Some(&step.text));
			step.delay
		});

		Ok(Some(Self { _timer: timer }))
	}
}
