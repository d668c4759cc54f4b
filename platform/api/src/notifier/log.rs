use super::{Notification, Notifier, NotifierError};

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
	fn name(&self) -> &str {
		"log"
	}

	async fn send(&self, notification: &Notification) -> Result<(), NotifierError> {
		tracing::info!(
			from = %notification.from,
			to = %notification.to,
			subject = %notification.subject,
			body = %notification.html,
			"notification"
		);

		Ok(())
	}
}
