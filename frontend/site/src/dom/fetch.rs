use tokio::sync::mpsc;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::XmlHttpRequest;

pub struct Response {
	pub status: u16,
	pub body: String,
}

/// Posts `body` as JSON. Errors only when the request could not complete.
pub async fn post_json(url: &str, body: &str) -> Result<Response, JsValue> {
	let xhr = XmlHttpRequest::new()?;
	xhr.open("POST", url)?;
	xhr.set_request_header("Content-Type", "application/json")?;

	let (tx, mut rx) = mpsc::channel(1);
	let closure = Closure::<dyn FnMut()>::new(move || {
		tx.try_send(()).ok();
	});
	xhr.set_onloadend(Some(closure.as_ref().unchecked_ref()));

	let sent = xhr.send_with_opt_str(Some(body));
	if sent.is_ok() {
		rx.recv().await;
	}

	xhr.set_onloadend(None);
	drop(closure);
	sent?;

	let status = xhr.status()?;
	if status == 0 {
		return Err(JsValue::from_str("Network error"));
	}

	Ok(Response {
		status,
		body: xhr.response_text()?.unwrap_or_default(),
	})
}
