use std::future::Future;

use binary_helper::config::DatabaseConfig;
use binary_helper::global::setup_database;

use self::memory::{MemoryStore, MemoryStoreError};
use self::postgres::{PostgresStore, PostgresStoreError};
use crate::config::StoreConfig;
use crate::database::{Message, NewMessage};

pub mod memory;
pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("postgres: {0}")]
	Postgres(#[from] PostgresStoreError),
	#[error("memory: {0}")]
	Memory(#[from] MemoryStoreError),
}

pub trait MessageStore {
	/// Get the name of the store
	fn name(&self) -> &str;

	/// Persist a submission, returning the stored row
	fn insert(&self, message: NewMessage) -> impl Future<Output = Result<Message, StoreError>> + Send;

	fn healthy(&self) -> impl Future<Output = bool> + Send {
		async { true }
	}
}

#[derive(Debug)]
pub enum AnyStore {
	Postgres(PostgresStore),
	Memory(MemoryStore),
}

impl MessageStore for AnyStore {
	fn name(&self) -> &str {
		match self {
			AnyStore::Postgres(store) => store.name(),
			AnyStore::Memory(store) => store.name(),
		}
	}

	async fn insert(&self, message: NewMessage) -> Result<Message, StoreError> {
		match self {
			AnyStore::Postgres(store) => store.insert(message).await,
			AnyStore::Memory(store) => store.insert(message).await,
		}
	}

	async fn healthy(&self) -> bool {
		match self {
			AnyStore::Postgres(store) => store.healthy().await,
			AnyStore::Memory(store) => store.healthy().await,
		}
	}
}

pub async fn build_store(config: &StoreConfig, database: &DatabaseConfig) -> anyhow::Result<AnyStore> {
	match config {
		StoreConfig::Postgres => {
			let pool = setup_database(database).await?;
			Ok(AnyStore::Postgres(PostgresStore::new(pool).await?))
		}
		StoreConfig::Memory(memory) => Ok(AnyStore::Memory(MemoryStore::new(memory))),
	}
}
