use std::sync::Arc;

use folio_utils::database::deadpool_postgres::PoolError;
use folio_utils::database::{tokio_postgres, FromRow, Pool};

use super::{MessageStore, StoreError};
use crate::database::{DatabaseTable, Message, NewMessage};

#[derive(Debug)]
pub struct PostgresStore {
	pool: Arc<Pool>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostgresStoreError {
	#[error("pool: {0}")]
	Pool(#[from] PoolError),
	#[error("query: {0}")]
	Query(#[from] tokio_postgres::Error),
}

impl PostgresStore {
	#[tracing::instrument(skip_all, name = "PostgresStore::new", err)]
	pub async fn new(pool: Arc<Pool>) -> Result<Self, PostgresStoreError> {
		tracing::debug!(table = Message::NAME, "ensuring schema");

		pool.get().await?.batch_execute(Message::SCHEMA).await?;

		Ok(Self { pool })
	}

	async fn insert_row(&self, message: &NewMessage) -> Result<Message, PostgresStoreError> {
		let client = self.pool.get().await?;

		let row = client
			.query_one(
				"INSERT INTO messages (name, email, message) VALUES ($1, $2, $3) RETURNING *",
				&[&message.name, &message.email, &message.message],
			)
			.await?;

		Ok(Message::try_from_row(&row)?)
	}
}

impl MessageStore for PostgresStore {
	fn name(&self) -> &str {
		"postgres"
	}

	#[tracing::instrument(skip_all, name = "PostgresStore::insert", err)]
	async fn insert(&self, message: NewMessage) -> Result<Message, StoreError> {
		let message = self.insert_row(&message).await?;
		tracing::debug!(id = message.id, "stored {}", Message::FRIENDLY_NAME);

		Ok(message)
	}

	async fn healthy(&self) -> bool {
		match self.pool.get().await {
			Ok(client) => client.simple_query("SELECT 1").await.is_ok(),
			Err(_) => false,
		}
	}
}
