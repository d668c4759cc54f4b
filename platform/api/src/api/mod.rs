use std::sync::Arc;

use anyhow::Context as _;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{ApiConfig, Environment};
use crate::global::ApiGlobal;

pub mod contact;
mod cors;
pub mod error;
pub mod health;

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router {
	let config = global.config::<ApiConfig>();

	let router = Router::new()
		.route("/api/contact", post(contact::submit::<G>))
		.route("/health", get(health::health::<G>));

	// The site itself is served from disk when a directory is configured.
	let router = match &config.static_dir {
		Some(dir) => router.fallback_service(ServeDir::new(dir)),
		None => router.fallback(not_found),
	};

	router
		.layer(cors::cors_layer(config, *global.config::<Environment>()))
		.layer(TraceLayer::new_for_http())
		.with_state(global.clone())
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
	(
		StatusCode::NOT_FOUND,
		Json(json!({
			"error": "not_found",
		})),
	)
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<ApiConfig>();

	tracing::info!("listening on {}", config.bind_address);
	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.bind(config.bind_address).context("failed to bind api socket")?;
	let listener = socket.listen(1024)?;

	let router = routes(&global);

	// In-flight requests finish before this returns.
	let ctx = global.ctx().clone();
	axum::serve(listener, router)
		.with_graceful_shutdown(async move {
			ctx.done().await;
		})
		.await
		.context("api server failed")?;

	tracing::info!("api server stopped");

	Ok(())
}
