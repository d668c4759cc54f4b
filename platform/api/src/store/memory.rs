use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{MessageStore, StoreError};
use crate::config::MemoryStoreConfig;
use crate::database::{Message, NewMessage};

#[derive(Debug)]
pub struct MemoryStore {
	messages: RwLock<Vec<Message>>,
	fail: AtomicBool,
	delay: Duration,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MemoryStoreError {
	#[error("store unavailable")]
	Unavailable,
}

impl MemoryStore {
	pub fn new(config: &MemoryStoreConfig) -> Self {
		tracing::debug!("setting up memory store");
		Self {
			messages: RwLock::new(Vec::new()),
			fail: AtomicBool::new(config.fail),
			delay: config.delay,
		}
	}

	/// Makes every following insert fail (or succeed again).
	pub fn set_fail(&self, fail: bool) {
		self.fail.store(fail, Ordering::Relaxed);
	}

	pub async fn messages(&self) -> Vec<Message> {
		self.messages.read().await.clone()
	}
}

impl MessageStore for MemoryStore {
	fn name(&self) -> &str {
		"memory"
	}

	#[tracing::instrument(skip_all, name = "MemoryStore::insert", err)]
	async fn insert(&self, message: NewMessage) -> Result<Message, StoreError> {
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}

		if self.fail.load(Ordering::Relaxed) {
			return Err(MemoryStoreError::Unavailable.into());
		}

		let mut messages = self.messages.write().await;

		let now = Utc::now();
		let message = Message {
			id: messages.len() as i64 + 1,
			name: message.name,
			email: message.email,
			message: message.message,
			created_at: now,
			updated_at: now,
		};

		messages.push(message.clone());
		tracing::debug!(id = message.id, "stored message");

		Ok(message)
	}

	async fn healthy(&self) -> bool {
		!self.fail.load(Ordering::Relaxed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn submission(name: &str) -> NewMessage {
		NewMessage {
			name: name.to_string(),
			email: "a@b.com".to_string(),
			message: "Hello there friend".to_string(),
		}
	}

	#[tokio::test]
	async fn test_insert_assigns_ids() {
		let store = MemoryStore::new(&MemoryStoreConfig::default());

		let first = store.insert(submission("Al")).await.expect("failed to insert");
		let second = store.insert(submission("Bo")).await.expect("failed to insert");

		assert_eq!(first.id, 1);
		assert_eq!(second.id, 2);
		assert_eq!(first.created_at, first.updated_at);
		assert_eq!(store.messages().await, vec![first, second]);
	}

	#[tokio::test]
	async fn test_failing_store() {
		let store = MemoryStore::new(&MemoryStoreConfig {
			fail: true,
			..Default::default()
		});

		assert!(!store.healthy().await);
		assert!(matches!(
			store.insert(submission("Al")).await,
			Err(StoreError::Memory(MemoryStoreError::Unavailable))
		));
		assert!(store.messages().await.is_empty());

		store.set_fail(false);
		assert!(store.healthy().await);
		assert!(store.insert(submission("Al")).await.is_ok());
	}
}
