use tokio::select;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc, Mutex, Notify};

use crate::config::{DispatchMode, NotifierConfig};
use crate::notifier::{AnyNotifier, Notification, Notifier, NotifierError};

/// A notification the worker gave up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
	pub notification: Notification,
	pub error: String,
}

/// A bounded queue of notifications drained by [`Outbox::run`].
pub struct Outbox {
	notifier: AnyNotifier,
	tx: mpsc::Sender<Notification>,
	rx: Mutex<mpsc::Receiver<Notification>>,
	failures: broadcast::Sender<DeliveryFailure>,
	closing: Notify,
}

impl Outbox {
	pub fn new(notifier: AnyNotifier, capacity: usize) -> Self {
		let (tx, rx) = mpsc::channel(capacity.max(1));
		let (failures, _) = broadcast::channel(16);

		Self {
			notifier,
			tx,
			rx: Mutex::new(rx),
			failures,
			closing: Notify::new(),
		}
	}

	pub fn enqueue(&self, notification: Notification) -> Result<(), NotifierError> {
		self.tx.try_send(notification).map_err(|err| match err {
			TrySendError::Full(_) => NotifierError::OutboxFull,
			TrySendError::Closed(_) => NotifierError::OutboxClosed,
		})
	}

	pub fn failures(&self) -> broadcast::Receiver<DeliveryFailure> {
		self.failures.subscribe()
	}

	/// Stops accepting notifications. [`Outbox::run`] sends what is still
	/// queued and then returns.
	pub fn close(&self) {
		self.closing.notify_one();
	}

	/// Sends queued notifications until [`Outbox::close`] is called, then
	/// closes the queue and sends whatever is still in it.
	pub async fn run(&self) {
		let mut rx = self.rx.lock().await;

		loop {
			select! {
				_ = self.closing.notified() => break,
				Some(notification) = rx.recv() => self.deliver(notification).await,
			}
		}

		rx.close();

		let mut drained = 0;
		while let Some(notification) = rx.recv().await {
			self.deliver(notification).await;
			drained += 1;
		}

		tracing::debug!(drained, "outbox closed");
	}

	async fn deliver(&self, notification: Notification) {
		if let Err(err) = self.notifier.send(&notification).await {
			tracing::error!(notifier = self.notifier.name(), "failed to send notification: {err}");

			// Nobody listening is fine.
			self.failures
				.send(DeliveryFailure {
					notification,
					error: err.to_string(),
				})
				.ok();
		}
	}
}

/// Hands contact notifications to the notifier, either directly or through the outbox.
pub enum Dispatcher {
	Inline(AnyNotifier),
	Queued(Outbox),
}

impl Dispatcher {
	pub fn new(config: &NotifierConfig, notifier: AnyNotifier) -> Self {
		match config.dispatch {
			DispatchMode::Inline => Self::Inline(notifier),
			DispatchMode::Queued => Self::Queued(Outbox::new(notifier, config.outbox_capacity)),
		}
	}

	pub fn notifier(&self) -> &AnyNotifier {
		match self {
			Self::Inline(notifier) => notifier,
			Self::Queued(outbox) => &outbox.notifier,
		}
	}

	/// In inline mode this resolves once the notifier answered, in queued mode
	/// once the notification is queued.
	pub async fn dispatch(&self, notification: Notification) -> Result<(), NotifierError> {
		match self {
			Self::Inline(notifier) => notifier.send(&notification).await,
			Self::Queued(outbox) => outbox.enqueue(notification),
		}
	}

	pub fn failures(&self) -> Option<broadcast::Receiver<DeliveryFailure>> {
		match self {
			Self::Inline(_) => None,
			Self::Queued(outbox) => Some(outbox.failures()),
		}
	}

	/// Drives the outbox until [`Dispatcher::close`], returns at once in inline mode.
	pub async fn run(&self) {
		if let Self::Queued(outbox) = self {
			outbox.run().await;
		}
	}

	pub fn close(&self) {
		if let Self::Queued(outbox) = self {
			outbox.close();
		}
	}
}

#[cfg(test)]
mod tests;
