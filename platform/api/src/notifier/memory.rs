use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, Notify};

use super::{Notification, Notifier, NotifierError};
use crate::config::MemoryNotifierConfig;

#[derive(Debug)]
pub struct MemoryNotifier {
	attempts: Mutex<Vec<Notification>>,
	attempted: Notify,
	fail: AtomicBool,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MemoryNotifierError {
	#[error("delivery refused")]
	Refused,
}

impl MemoryNotifier {
	pub fn new(config: &MemoryNotifierConfig) -> Self {
		Self {
			attempts: Mutex::new(Vec::new()),
			attempted: Notify::new(),
			fail: AtomicBool::new(config.fail),
		}
	}

	pub fn set_fail(&self, fail: bool) {
		self.fail.store(fail, Ordering::Relaxed);
	}

	/// Every notification a send was attempted for, failed ones included.
	pub async fn attempts(&self) -> Vec<Notification> {
		self.attempts.lock().await.clone()
	}

	/// Waits until at least `count` sends have been attempted.
	pub async fn wait_for(&self, count: usize) -> Vec<Notification> {
		loop {
			let attempted = self.attempted.notified();

			{
				let attempts = self.attempts.lock().await;
				if attempts.len() >= count {
					return attempts.clone();
				}
			}

			attempted.await;
		}
	}
}

impl Notifier for MemoryNotifier {
	fn name(&self) -> &str {
		"memory"
	}

	#[tracing::instrument(skip_all, name = "MemoryNotifier::send", err)]
	async fn send(&self, notification: &Notification) -> Result<(), NotifierError> {
		self.attempts.lock().await.push(notification.clone());
		self.attempted.notify_waiters();

		if self.fail.load(Ordering::Relaxed) {
			return Err(MemoryNotifierError::Refused.into());
		}

		Ok(())
	}
}
