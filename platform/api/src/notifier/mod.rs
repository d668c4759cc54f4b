use std::future::Future;

use self::log::LogNotifier;
use self::memory::{MemoryNotifier, MemoryNotifierError};
use self::smtp::{SmtpNotifier, SmtpNotifierError};
use crate::config::NotifierBackendConfig;
use crate::database::NewMessage;

pub mod log;
pub mod memory;
pub mod smtp;

pub const CONTACT_SUBJECT: &str = "New Contact Form Submission";

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
	#[error("smtp: {0}")]
	Smtp(#[from] SmtpNotifierError),
	#[error("memory: {0}")]
	Memory(#[from] MemoryNotifierError),
	#[error("outbox is full")]
	OutboxFull,
	#[error("outbox is closed")]
	OutboxClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub from: String,
	pub to: String,
	pub subject: String,
	pub html: String,
}

impl Notification {
	/// The email sent to the site owner for a contact submission.
	pub fn contact(mailbox: &str, message: &NewMessage) -> Self {
		Self {
			from: mailbox.to_string(),
			to: mailbox.to_string(),
			subject: CONTACT_SUBJECT.to_string(),
			html: format!(
				"<h3>New Message from Portfolio Contact Form</h3>\n<p><strong>Name:</strong> {}</p>\n<p><strong>Email:</strong> {}</p>\n<p><strong>Message:</strong> {}</p>",
				escape_html(&message.name),
				escape_html(&message.email),
				escape_html(&message.message),
			),
		}
	}
}

fn escape_html(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());

	for c in value.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			c => escaped.push(c),
		}
	}

	escaped
}

pub trait Notifier {
	/// Get the name of the notifier
	fn name(&self) -> &str;

	/// Deliver a notification, once
	fn send(&self, notification: &Notification) -> impl Future<Output = Result<(), NotifierError>> + Send;
}

#[derive(Debug)]
pub enum AnyNotifier {
	Smtp(SmtpNotifier),
	Log(LogNotifier),
	Memory(MemoryNotifier),
}

impl Notifier for AnyNotifier {
	fn name(&self) -> &str {
		match self {
			AnyNotifier::Smtp(notifier) => notifier.name(),
			AnyNotifier::Log(notifier) => notifier.name(),
			AnyNotifier::Memory(notifier) => notifier.name(),
		}
	}

	async fn send(&self, notification: &Notification) -> Result<(), NotifierError> {
		match self {
			AnyNotifier::Smtp(notifier) => notifier.send(notification).await,
			AnyNotifier::Log(notifier) => notifier.send(notification).await,
			AnyNotifier::Memory(notifier) => notifier.send(notification).await,
		}
	}
}

pub fn build_notifier(config: &NotifierBackendConfig) -> Result<AnyNotifier, NotifierError> {
	match config {
		NotifierBackendConfig::Smtp(smtp) => Ok(AnyNotifier::Smtp(SmtpNotifier::new(smtp)?)),
		NotifierBackendConfig::Log => Ok(AnyNotifier::Log(LogNotifier)),
		NotifierBackendConfig::Memory(memory) => Ok(AnyNotifier::Memory(MemoryNotifier::new(memory))),
	}
}
