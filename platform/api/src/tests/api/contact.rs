use std::time::Duration;

use folio_utils::prelude::FutureTimeout;
use serde_json::{json, Value};

use super::TestServer;
use crate::config::{
	DispatchMode, Environment, MemoryNotifierConfig, MemoryStoreConfig, NotifierBackendConfig, StoreConfig,
};
use crate::global::ContactState;
use crate::notifier::{Notification, NotifierError};

async fn post(server: &TestServer, body: Value) -> (reqwest::StatusCode, Value) {
	let resp = server
		.client
		.post(server.url("/api/contact"))
		.json(&body)
		.send()
		.await
		.expect("failed to post contact");

	let status = resp.status();
	(status, resp.json().await.expect("failed to read body"))
}

fn submission() -> Value {
	json!({
		"name": "Al",
		"email": "a@b.com",
		"message": "Hello there friend",
	})
}

#[tokio::test]
async fn test_submission_is_stored_and_notified() {
	let server = TestServer::start(|_| {}).await;

	let (status, body) = post(&server, submission()).await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body, json!({"message": "Message sent successfully"}));

	let messages = server.global.memory_store().messages().await;
	assert_eq!(messages.len(), 1);
	assert_eq!(messages[0].name, "Al");
	assert_eq!(messages[0].email, "a@b.com");
	assert_eq!(messages[0].message, "Hello there friend");

	let attempts = server
		.global
		.memory_notifier()
		.wait_for(1)
		.timeout(Duration::from_secs(1))
		.await
		.expect("notification was not sent");
	assert_eq!(attempts.len(), 1);
	assert_eq!(attempts[0].to, "me@example.com");
	assert_eq!(attempts[0].subject, "New Contact Form Submission");
	assert!(attempts[0].html.contains("<p><strong>Name:</strong> Al</p>"));
	assert!(attempts[0].html.contains("<p><strong>Email:</strong> a@b.com</p>"));
	assert!(attempts[0].html.contains("<p><strong>Message:</strong> Hello there friend</p>"));

	server.shutdown().await;
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
	let server = TestServer::start(|_| {}).await;

	for body in [
		json!({"name": "", "email": "a@b.com", "message": "Hello there friend"}),
		json!({"name": "Al", "email": null, "message": "Hello there friend"}),
		json!({"name": "Al", "email": "a@b.com"}),
		json!({}),
	] {
		let (status, body) = post(&server, body).await;
		assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
		assert_eq!(body, json!({"error": "All fields are required"}));
	}

	assert!(server.global.memory_store().messages().await.is_empty());
	assert!(server.global.memory_notifier().attempts().await.is_empty());

	server.shutdown().await;
}

#[tokio::test]
async fn test_non_json_body_is_an_empty_form() {
	let server = TestServer::start(|_| {}).await;

	let resp = server
		.client
		.post(server.url("/api/contact"))
		.header("Content-Type", "text/plain")
		.body(r#"{"name":"Al","email":"a@b.com","message":"Hello there friend"}"#)
		.send()
		.await
		.expect("failed to post contact");
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

	assert!(server.global.memory_store().messages().await.is_empty());

	server.shutdown().await;
}

#[tokio::test]
async fn test_store_failure_skips_notification() {
	let server = TestServer::start(|_| {}).await;
	server.global.memory_store().set_fail(true);

	let (status, body) = post(&server, submission()).await;
	assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		body,
		json!({"error": "Failed to send message", "details": "memory: store unavailable"})
	);

	// Give a queued notification the chance to show up.
	tokio::time::sleep(Duration::from_millis(100)).await;
	assert!(server.global.memory_notifier().attempts().await.is_empty());

	server.shutdown().await;
}

#[tokio::test]
async fn test_production_hides_details() {
	let server = TestServer::start(|config| config.extra.environment = Environment::Production).await;
	server.global.memory_store().set_fail(true);

	let (status, body) = post(&server, submission()).await;
	assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		body,
		json!({"error": "Failed to send message", "details": "Internal server error"})
	);

	server.shutdown().await;
}

#[tokio::test]
async fn test_inline_notifier_failure() {
	let server = TestServer::start(|config| {
		config.extra.notifier.dispatch = DispatchMode::Inline;
		config.extra.notifier.backend = NotifierBackendConfig::Memory(MemoryNotifierConfig { fail: true });
	})
	.await;

	let (status, body) = post(&server, submission()).await;
	assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		body,
		json!({"error": "Failed to send message", "details": "memory: delivery refused"})
	);

	// The row is written before the notifier is asked.
	assert_eq!(server.global.memory_store().messages().await.len(), 1);
	assert_eq!(server.global.memory_notifier().attempts().await.len(), 1);

	server.shutdown().await;
}

#[tokio::test]
async fn test_queued_notifier_failure() {
	let server = TestServer::start(|config| {
		config.extra.notifier.backend = NotifierBackendConfig::Memory(MemoryNotifierConfig { fail: true });
	})
	.await;

	let mut failures = server
		.global
		.dispatcher()
		.failures()
		.expect("queued dispatch has a failure channel");

	let (status, body) = post(&server, submission()).await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body, json!({"message": "Message sent successfully"}));

	let failure = failures
		.recv()
		.timeout(Duration::from_secs(1))
		.await
		.expect("no failure published")
		.expect("failure channel closed");
	assert!(failure.notification.html.contains("Hello there friend"));
	assert_eq!(failure.error, "memory: delivery refused");

	assert_eq!(server.global.memory_store().messages().await.len(), 1);

	server.shutdown().await;
}

#[tokio::test]
async fn test_malformed_json() {
	let server = TestServer::start(|_| {}).await;

	let resp = server
		.client
		.post(server.url("/api/contact"))
		.header("Content-Type", "application/json")
		.body(r#"{"name": "Al","#)
		.send()
		.await
		.expect("failed to post contact");
	assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body["error"], "Something went wrong!");
	assert!(body["details"].is_string());

	server.shutdown().await;

	let server = TestServer::start(|config| config.extra.environment = Environment::Production).await;

	let (status, body) = post(&server, json!({"name": 5, "email": "a@b.com", "message": "Hello there friend"})).await;
	assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body, json!({"error": "Something went wrong!"}));

	server.shutdown().await;
}

#[tokio::test]
async fn test_retries_are_not_deduplicated() {
	let server = TestServer::start(|_| {}).await;

	for _ in 0..2 {
		let (status, _) = post(&server, submission()).await;
		assert_eq!(status, reqwest::StatusCode::OK);
	}

	let messages = server.global.memory_store().messages().await;
	assert_eq!(messages.len(), 2);
	assert_ne!(messages[0].id, messages[1].id);

	server
		.global
		.memory_notifier()
		.wait_for(2)
		.timeout(Duration::from_secs(1))
		.await
		.expect("notifications were not sent");

	server.shutdown().await;
}

#[tokio::test]
async fn test_submission_in_flight_at_shutdown_is_delivered() {
	let server = TestServer::start(|config| {
		config.extra.store = StoreConfig::Memory(MemoryStoreConfig {
			delay: Duration::from_millis(300),
			..Default::default()
		});
	})
	.await;

	let request = tokio::spawn({
		let client = server.client.clone();
		let url = server.url("/api/contact");
		async move { client.post(url).json(&submission()).send().await }
	});

	// Let the request reach the store before shutting down.
	tokio::time::sleep(Duration::from_millis(100)).await;

	let TestServer {
		global,
		client,
		handler,
		server,
	} = server;
	let cancel = tokio::spawn(handler.cancel());

	let resp = request
		.timeout(Duration::from_secs(2))
		.await
		.expect("request did not finish")
		.expect("request panicked")
		.expect("failed to post contact");
	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({"message": "Message sent successfully"}));

	server
		.timeout(Duration::from_secs(1))
		.await
		.expect("server did not stop")
		.expect("server panicked")
		.expect("server failed");

	assert_eq!(global.memory_store().messages().await.len(), 1);
	assert_eq!(global.memory_notifier().attempts().await.len(), 1);

	// Only once the server is done does the outbox stop accepting.
	let late = Notification {
		from: "me@example.com".to_string(),
		to: "me@example.com".to_string(),
		subject: "New Contact Form Submission".to_string(),
		html: "<p>late</p>".to_string(),
	};
	assert!(matches!(
		global.dispatcher().dispatch(late).await,
		Err(NotifierError::OutboxClosed)
	));

	drop(client);
	drop(global);
	cancel
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel context")
		.expect("cancel panicked");
}
