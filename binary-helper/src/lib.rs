use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use folio_utils::context::Context;
use folio_utils::signal::SignalHandler;
use tokio::{select, time};
pub use traits::{Config, Global};

pub mod config;
pub mod global;
pub mod logging;
pub mod traits;

/// Runs a service process: parses config, sets up logging and global state,
/// then drives `process` until it exits or a shutdown signal arrives.
pub async fn bootstrap<C: Config, G: Global<C> + Send + Sync + 'static, F: Future<Output = anyhow::Result<()>> + Send + 'static>(
	process: impl FnOnce(Arc<G>) -> F,
) -> anyhow::Result<()> {
	let (ctx, handler) = Context::new();

	let config = C::parse()
		.and_then(|mut config| {
			config.pre_hook()?;
			Ok(config)
		})
		.map_err(|err| {
			// Still surface the parse error even though the configured logger never came up.
			logging::init("trace", Default::default()).ok();

			err
		})
		.context("failed to parse config")?;

	logging::init(&config.logging().level, config.logging().mode).context("failed to init logging")?;

	tracing::info!(name = config.name(), "starting up");

	let global = Arc::new(G::new(ctx, config).await.context("failed to create global state")?);

	tracing::debug!("global state created, starting process");

	let process_future = tokio::spawn(process(global));

	let mut signal_handler = SignalHandler::shutdown();

	select! {
		_ = signal_handler.recv() => tracing::info!("shutting down"),
		r = process_future => match r {
			Ok(Ok(())) => tracing::warn!("process exited"),
			Ok(Err(err)) => tracing::error!("process stopped unexpectedly: {err:#}"),
			Err(err) => tracing::error!("process panicked: {err}"),
		},
	}

	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = handler.cancel() => tracing::info!("shutting down"),
	}

	Ok(())
}
