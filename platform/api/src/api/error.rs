use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::config::Environment;
use crate::notifier::NotifierError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("All fields are required")]
	Validation,
	#[error("failed to store message: {0}")]
	Persistence(#[from] StoreError),
	#[error("failed to send notification: {0}")]
	Notification(#[from] NotifierError),
	#[error("malformed request body: {0}")]
	MalformedBody(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
	pub error: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}

impl ApiError {
	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::Validation => StatusCode::BAD_REQUEST,
			ApiError::Persistence(_) | ApiError::Notification(_) | ApiError::MalformedBody(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	pub fn body(&self, environment: Environment) -> ErrorBody {
		let development = environment.is_development();

		match self {
			ApiError::Validation => ErrorBody {
				error: self.to_string(),
				details: None,
			},
			ApiError::Persistence(err) => failed_to_send(err.to_string(), development),
			ApiError::Notification(err) => failed_to_send(err.to_string(), development),
			ApiError::MalformedBody(err) => ErrorBody {
				error: "Something went wrong!".to_string(),
				details: development.then(|| err.to_string()),
			},
		}
	}

	pub fn into_response(self, environment: Environment) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!("{self}");
		} else {
			tracing::debug!("rejected request: {self}");
		}

		(status, Json(self.body(environment))).into_response()
	}
}

fn failed_to_send(details: String, development: bool) -> ErrorBody {
	ErrorBody {
		error: "Failed to send message".to_string(),
		details: Some(if development {
			details
		} else {
			"Internal server error".to_string()
		}),
	}
}
