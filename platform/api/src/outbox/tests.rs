use std::time::Duration;

use folio_utils::prelude::FutureTimeout;

use super::*;
use crate::config::MemoryNotifierConfig;
use crate::notifier::memory::MemoryNotifier;

fn memory_notifier(fail: bool) -> AnyNotifier {
	AnyNotifier::Memory(MemoryNotifier::new(&MemoryNotifierConfig { fail }))
}

fn memory(dispatcher: &Dispatcher) -> &MemoryNotifier {
	match dispatcher.notifier() {
		AnyNotifier::Memory(notifier) => notifier,
		other => panic!("unexpected notifier: {}", other.name()),
	}
}

fn notification(name: &str) -> Notification {
	Notification {
		from: "me@example.com".to_string(),
		to: "me@example.com".to_string(),
		subject: "New Contact Form Submission".to_string(),
		html: format!("<p>{name}</p>"),
	}
}

fn config(dispatch: DispatchMode, outbox_capacity: usize) -> NotifierConfig {
	NotifierConfig {
		dispatch,
		outbox_capacity,
		..Default::default()
	}
}

#[tokio::test]
async fn test_queued_delivers_once() {
	let dispatcher = std::sync::Arc::new(Dispatcher::new(&config(DispatchMode::Queued, 8), memory_notifier(false)));

	let worker = tokio::spawn({
		let dispatcher = dispatcher.clone();
		async move { dispatcher.run().await }
	});

	dispatcher.dispatch(notification("a")).await.expect("failed to enqueue");
	dispatcher.dispatch(notification("b")).await.expect("failed to enqueue");

	let attempts = memory(&dispatcher)
		.wait_for(2)
		.timeout(Duration::from_secs(1))
		.await
		.expect("notifications were not delivered");
	assert_eq!(attempts, vec![notification("a"), notification("b")]);

	dispatcher.close();
	worker.timeout(Duration::from_secs(1)).await.unwrap().unwrap();

	assert_eq!(memory(&dispatcher).attempts().await.len(), 2);
}

#[tokio::test]
async fn test_queued_failures_are_published() {
	let dispatcher = std::sync::Arc::new(Dispatcher::new(&config(DispatchMode::Queued, 8), memory_notifier(true)));
	let mut failures = dispatcher.failures().expect("queued dispatch has a failure channel");

	let worker = tokio::spawn({
		let dispatcher = dispatcher.clone();
		async move { dispatcher.run().await }
	});

	// The request side never sees the failure.
	dispatcher.dispatch(notification("a")).await.expect("failed to enqueue");

	let failure = failures
		.recv()
		.timeout(Duration::from_secs(1))
		.await
		.expect("no failure published")
		.expect("failure channel closed");
	assert_eq!(failure.notification, notification("a"));
	assert_eq!(failure.error, "memory: delivery refused");

	dispatcher.close();
	worker.timeout(Duration::from_secs(1)).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_full_outbox() {
	let dispatcher = Dispatcher::new(&config(DispatchMode::Queued, 1), memory_notifier(false));

	dispatcher.dispatch(notification("a")).await.expect("failed to enqueue");
	assert!(matches!(
		dispatcher.dispatch(notification("b")).await,
		Err(NotifierError::OutboxFull)
	));
}

#[tokio::test]
async fn test_drains_on_close() {
	let dispatcher = Dispatcher::new(&config(DispatchMode::Queued, 8), memory_notifier(false));

	for name in ["a", "b", "c"] {
		dispatcher.dispatch(notification(name)).await.expect("failed to enqueue");
	}

	// Closing before the worker starts still sends everything queued.
	dispatcher.close();
	dispatcher.run().timeout(Duration::from_secs(1)).await.expect("worker did not stop");

	assert_eq!(memory(&dispatcher).attempts().await.len(), 3);
	assert!(matches!(
		dispatcher.dispatch(notification("d")).await,
		Err(NotifierError::OutboxClosed)
	));
}

#[tokio::test]
async fn test_accepts_until_closed() {
	let dispatcher = std::sync::Arc::new(Dispatcher::new(&config(DispatchMode::Queued, 8), memory_notifier(false)));

	let worker = tokio::spawn({
		let dispatcher = dispatcher.clone();
		async move { dispatcher.run().await }
	});

	dispatcher.dispatch(notification("a")).await.expect("failed to enqueue");
	memory(&dispatcher)
		.wait_for(1)
		.timeout(Duration::from_secs(1))
		.await
		.expect("notification was not delivered");

	// A running worker never closes the queue by itself.
	tokio::time::sleep(Duration::from_millis(50)).await;
	assert!(!worker.is_finished());
	dispatcher.dispatch(notification("b")).await.expect("failed to enqueue");

	dispatcher.close();
	worker.timeout(Duration::from_secs(1)).await.unwrap().unwrap();

	assert_eq!(memory(&dispatcher).attempts().await, vec![notification("a"), notification("b")]);
}

#[tokio::test]
async fn test_inline_reports_failures() {
	let dispatcher = Dispatcher::new(&config(DispatchMode::Inline, 8), memory_notifier(true));
	assert!(dispatcher.failures().is_none());
	dispatcher.run().timeout(Duration::from_secs(1)).await.expect("inline dispatch has no worker");
	dispatcher.close();

	assert!(matches!(
		dispatcher.dispatch(notification("a")).await,
		Err(NotifierError::Memory(_))
	));
	assert_eq!(memory(&dispatcher).attempts().await, vec![notification("a")]);

	memory(&dispatcher).set_fail(false);
	dispatcher.dispatch(notification("b")).await.expect("failed to send");
	assert_eq!(memory(&dispatcher).attempts().await.len(), 2);
}
