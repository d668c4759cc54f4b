pub use deadpool_postgres::Pool;
pub use postgres_from_row::FromRow;
pub use {deadpool_postgres, postgres_from_row, postgres_types, tokio_postgres};
