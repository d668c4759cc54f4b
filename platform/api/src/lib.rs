use std::sync::Arc;

use anyhow::Context as _;

use crate::global::ApiGlobal;

pub mod api;
pub mod config;
pub mod database;
pub mod global;
pub mod notifier;
pub mod outbox;
pub mod store;

/// Runs the API server and the outbox worker. The outbox keeps accepting
/// notifications until the server has finished its in-flight requests, then
/// sends what is left and closes.
pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let server = async {
		let result = api::run(global.clone()).await;
		global.dispatcher().close();
		result
	};

	let (result, ()) = tokio::join!(server, global.dispatcher().run());

	result.context("api server stopped unexpectedly")
}

#[cfg(test)]
mod tests;
