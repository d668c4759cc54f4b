use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_ENDPOINT: &str = "/api/contact";

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Where the form posts to, the `action` attribute wins when set.
pub fn endpoint(action: Option<&str>) -> &str {
	match action.map(str::trim) {
		Some(action) if !action.is_empty() => action,
		_ => DEFAULT_ENDPOINT,
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
	Name,
	Email,
	Message,
}

impl Field {
	pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

	/// The id of the input element.
	pub fn id(&self) -> &'static str {
		match self {
			Field::Name => "name",
			Field::Email => "email",
			Field::Message => "message",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
	pub field: Field,
	pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ContactForm {
	pub name: String,
	pub email: String,
	pub message: String,
}

impl ContactForm {
	/// Field values are kept as typed, whitespace included.
	pub fn from_fields(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			email: email.into(),
			message: message.into(),
		}
	}

	/// Client side checks only, the server does its own.
	pub fn validate(&self) -> Vec<FieldError> {
		let mut errors = Vec::new();

		if self.name.chars().count() < 2 {
			errors.push(FieldError {
				field: Field::Name,
				message: "Name must be at least 2 characters",
			});
		}

		if !EMAIL.is_match(&self.email) {
			errors.push(FieldError {
				field: Field::Email,
				message: "Please enter a valid email address",
			});
		}

		if self.message.chars().count() < 10 {
			errors.push(FieldError {
				field: Field::Message,
				message: "Message must be at least 10 characters",
			});
		}

		errors
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}
}

#[derive(Debug, Default, serde::Deserialize)]
struct ErrorResponse {
	error: Option<String>,
	details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	Sent,
	Failed(String),
}

impl Outcome {
	pub fn from_response(status: u16, body: &str) -> Self {
		if (200..300).contains(&status) {
			return Self::Sent;
		}

		let response: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
		Self::Failed(
			response
				.error
				.filter(|error| !error.is_empty())
				.or(response.details.filter(|details| !details.is_empty()))
				.unwrap_or_else(|| "Failed to send message".to_string()),
		)
	}

	/// The request never got an answer.
	pub fn transport(error: impl Into<String>) -> Self {
		Self::Failed(error.into())
	}

	pub fn banner_class(&self) -> &'static str {
		match self {
			Self::Sent => "success-message",
			Self::Failed(_) => "error-message",
		}
	}

	pub fn banner_text(&self) -> String {
		match self {
			Self::Sent => "Message sent successfully!".to_string(),
			Self::Failed(error) => format!("Error: {error}"),
		}
	}
}
