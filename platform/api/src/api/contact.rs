use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::error::ApiError;
use crate::config::{Environment, NotifierConfig};
use crate::database::{Message, NewMessage};
use crate::global::ApiGlobal;
use crate::notifier::Notification;
use crate::store::MessageStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ContactRequest {
	pub name: Option<String>,
	pub email: Option<String>,
	pub message: Option<String>,
}

impl ContactRequest {
	/// Missing, null and empty fields are all rejected. Nothing else is checked.
	pub fn validate(self) -> Result<NewMessage, ApiError> {
		match (non_empty(self.name), non_empty(self.email), non_empty(self.message)) {
			(Some(name), Some(email), Some(message)) => Ok(NewMessage { name, email, message }),
			_ => Err(ApiError::Validation),
		}
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContactResponse {
	pub message: String,
}

/// Bodies without a JSON content type, and empty ones, read as an empty form.
fn parse_request(headers: &HeaderMap, body: &[u8]) -> Result<ContactRequest, ApiError> {
	let is_json = headers
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split(';').next())
		.map(|mime| {
			let mime = mime.trim().to_ascii_lowercase();
			mime == "application/json" || mime.ends_with("+json")
		})
		.unwrap_or(false);

	if !is_json || body.is_empty() {
		return Ok(ContactRequest::default());
	}

	Ok(serde_json::from_slice(body)?)
}

/// Validate, persist, then notify. Persistence failures never reach the notifier.
pub async fn process<G: ApiGlobal>(global: &Arc<G>, request: ContactRequest) -> Result<Message, ApiError> {
	let submission = request.validate()?;

	let notification = Notification::contact(&global.config::<NotifierConfig>().mailbox, &submission);

	let message = global.store().insert(submission).await?;

	global.dispatcher().dispatch(notification).await?;

	Ok(message)
}

#[tracing::instrument(skip_all, name = "contact::submit")]
pub async fn submit<G: ApiGlobal>(State(global): State<Arc<G>>, headers: HeaderMap, body: Bytes) -> Response {
	let environment = *global.config::<Environment>();

	let result = match parse_request(&headers, &body) {
		Ok(request) => process(&global, request).await,
		Err(err) => Err(err),
	};

	match result {
		Ok(message) => {
			tracing::info!(id = message.id, "contact message received");

			(
				StatusCode::OK,
				Json(ContactResponse {
					message: "Message sent successfully".to_string(),
				}),
			)
				.into_response()
		}
		Err(err) => err.into_response(environment),
	}
}
