use std::sync::Arc;
use std::time::Duration;

use folio_utils::context::Handler;
use folio_utils::prelude::FutureTimeout;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::config::{AppConfig, Environment};
use crate::tests::global::{memory_config, mock_global_state, GlobalState};

mod contact;

pub struct TestServer {
	pub global: Arc<GlobalState>,
	pub client: reqwest::Client,
	handler: Handler,
	server: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
	pub async fn start(config: impl FnOnce(&mut AppConfig)) -> Self {
		let port = portpicker::pick_unused_port().expect("failed to pick port");
		let mut app_config = memory_config(port);
		config(&mut app_config);

		let (global, handler) = mock_global_state(app_config);

		let server = tokio::spawn(crate::run(global.clone()));

		// We need to wait for the server to start
		tokio::time::sleep(Duration::from_millis(300)).await;

		Self {
			global,
			client: reqwest::Client::new(),
			handler,
			server,
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("http://{}{path}", self.global.config.extra.api.bind_address)
	}

	pub async fn shutdown(self) {
		let Self {
			global,
			client,
			handler,
			server,
		} = self;

		// The client uses Keep-Alive, so we need to drop it to release the global context
		drop(client);
		drop(global);

		handler
			.cancel()
			.timeout(Duration::from_secs(1))
			.await
			.expect("failed to cancel context");

		server
			.timeout(Duration::from_secs(1))
			.await
			.expect("server did not stop")
			.expect("server panicked")
			.expect("server failed");
	}
}

#[tokio::test]
async fn test_health() {
	let server = TestServer::start(|_| {}).await;

	let resp = server.client.get(server.url("/health")).send().await.expect("failed to get health");
	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({"status": "ok"}));

	server.global.memory_store().set_fail(true);

	let resp = server.client.get(server.url("/health")).send().await.expect("failed to get health");
	assert_eq!(resp.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({"status": "unhealthy"}));

	server.shutdown().await;
}

#[tokio::test]
async fn test_not_found() {
	let server = TestServer::start(|_| {}).await;

	let resp = server
		.client
		.get(server.url("/does/not/exist"))
		.send()
		.await
		.expect("failed to send request");
	assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({"error": "not_found"}));

	server.shutdown().await;
}

#[tokio::test]
async fn test_static_dir() {
	let dir = tempfile::tempdir().expect("failed to create temp dir");
	std::fs::write(dir.path().join("index.html"), "<h1>folio</h1>").expect("failed to write index");

	let static_dir = dir.path().to_path_buf();
	let server = TestServer::start(move |config| config.extra.api.static_dir = Some(static_dir)).await;

	let resp = server
		.client
		.get(server.url("/index.html"))
		.send()
		.await
		.expect("failed to send request");
	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	assert_eq!(resp.text().await.expect("failed to read body"), "<h1>folio</h1>");

	// API routes still win over the directory.
	let resp = server.client.get(server.url("/health")).send().await.expect("failed to get health");
	assert_eq!(resp.status(), reqwest::StatusCode::OK);

	server.shutdown().await;
}

async fn preflight(server: &TestServer, origin: &str) -> reqwest::Response {
	server
		.client
		.request(reqwest::Method::OPTIONS, server.url("/api/contact"))
		.header("Origin", origin)
		.header("Access-Control-Request-Method", "POST")
		.header("Access-Control-Request-Headers", "content-type")
		.send()
		.await
		.expect("failed to send preflight")
}

#[tokio::test]
async fn test_cors_development_allows_any_origin() {
	let server = TestServer::start(|_| {}).await;

	let resp = preflight(&server, "http://localhost:5173").await;
	assert!(resp.status().is_success());
	assert_eq!(
		resp.headers()
			.get("access-control-allow-origin")
			.and_then(|value| value.to_str().ok()),
		Some("*")
	);
	let methods = resp
		.headers()
		.get("access-control-allow-methods")
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_string();
	assert!(methods.contains("POST"));

	server.shutdown().await;
}

#[tokio::test]
async fn test_cors_production_allows_configured_origins() {
	let server = TestServer::start(|config| {
		config.extra.environment = Environment::Production;
		config.extra.api.allowed_origins = vec!["https://folio.example".to_string()];
	})
	.await;

	let resp = preflight(&server, "https://folio.example").await;
	assert_eq!(
		resp.headers()
			.get("access-control-allow-origin")
			.and_then(|value| value.to_str().ok()),
		Some("https://folio.example")
	);

	let resp = preflight(&server, "https://elsewhere.example").await;
	assert!(resp.headers().get("access-control-allow-origin").is_none());

	server.shutdown().await;
}
