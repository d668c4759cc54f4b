use chrono::{DateTime, Utc};

use super::DatabaseTable;

#[derive(Debug, Clone, PartialEq, Eq, postgres_from_row::FromRow)]
pub struct Message {
	/// The unique identifier for the message.
	pub id: i64,
	/// The name the sender gave.
	pub name: String,
	/// The reply address the sender gave, never validated.
	pub email: String,
	/// The message body.
	pub message: String,
	/// The time the message was received.
	pub created_at: DateTime<Utc>,
	/// The time the row was last written.
	pub updated_at: DateTime<Utc>,
}

impl DatabaseTable for Message {
	const FRIENDLY_NAME: &'static str = "message";
	const NAME: &'static str = "messages";
	const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS messages (
	id BIGSERIAL PRIMARY KEY,
	name VARCHAR(255) NOT NULL,
	email VARCHAR(255) NOT NULL,
	message TEXT NOT NULL,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
	updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";
}

/// A validated submission, every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
	pub name: String,
	pub email: String,
	pub message: String,
}
