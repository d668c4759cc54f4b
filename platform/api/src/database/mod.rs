mod message;

pub use message::*;

/// A table owned by this service.
pub trait DatabaseTable {
	const NAME: &'static str;
	const FRIENDLY_NAME: &'static str;

	/// Idempotent DDL run at start-up.
	const SCHEMA: &'static str;
}
