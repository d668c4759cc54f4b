use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a [`Context`] finished.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CancelReason {
	Parent,
	Deadline,
	Cancel,
}

impl Display for CancelReason {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Parent => write!(f, "Parent"),
			Self::Deadline => write!(f, "Deadline"),
			Self::Cancel => write!(f, "Cancel"),
		}
	}
}

struct RawContext {
	token: CancellationToken,
	parent: Option<Context>,
	deadline: Option<Instant>,
	// Every live context holds a sender; the handler waits for all of them to drop.
	_alive: mpsc::Sender<()>,
}

/// A cheap, clonable cancellation scope.
///
/// Tasks hold a clone for as long as they run. The owning [`Handler`] can
/// cancel the scope and then wait until every clone (including children
/// created with [`Context::with_parent`]) has been dropped.
#[derive(Clone)]
pub struct Context(Arc<RawContext>);

/// The owning side of a [`Context`].
pub struct Handler {
	token: CancellationToken,
	alive: mpsc::Receiver<()>,
}

impl Context {
	#[must_use]
	pub fn new() -> (Self, Handler) {
		Self::build(None, None)
	}

	#[must_use]
	pub fn with_deadline(deadline: Instant) -> (Self, Handler) {
		Self::build(None, Some(deadline))
	}

	#[must_use]
	pub fn with_timeout(timeout: std::time::Duration) -> (Self, Handler) {
		Self::with_deadline(Instant::now() + timeout)
	}

	/// Creates a child scope. The child is cancelled when the parent is, and the
	/// parent's handler also waits for the child to be dropped.
	#[must_use]
	pub fn with_parent(parent: Context, deadline: Option<Instant>) -> (Self, Handler) {
		Self::build(Some(parent), deadline)
	}

	fn build(parent: Option<Context>, deadline: Option<Instant>) -> (Self, Handler) {
		let (alive, recv) = mpsc::channel(1);
		let token = CancellationToken::new();

		(
			Self(Arc::new(RawContext {
				token: token.clone(),
				parent,
				deadline,
				_alive: alive,
			})),
			Handler { token, alive: recv },
		)
	}

	/// Resolves once the context is cancelled, its deadline passes or its parent finishes.
	pub async fn done(&self) -> CancelReason {
		let mut waits: Vec<Pin<Box<dyn Future<Output = CancelReason> + Send + '_>>> = Vec::new();

		waits.push(Box::pin(async {
			self.0.token.cancelled().await;
			CancelReason::Cancel
		}));

		if let Some(deadline) = self.0.deadline {
			waits.push(Box::pin(async move {
				tokio::time::sleep_until(deadline).await;
				CancelReason::Deadline
			}));
		}

		let mut parent = self.0.parent.as_ref();
		while let Some(ctx) = parent {
			let raw = &ctx.0;

			waits.push(Box::pin(async move {
				raw.token.cancelled().await;
				CancelReason::Parent
			}));

			if let Some(deadline) = raw.deadline {
				waits.push(Box::pin(async move {
					tokio::time::sleep_until(deadline).await;
					CancelReason::Parent
				}));
			}

			parent = raw.parent.as_ref();
		}

		futures::future::select_all(waits).await.0
	}

	pub fn is_done(&self) -> bool {
		self.0.token.is_cancelled()
			|| self.0.deadline.is_some_and(|deadline| deadline <= Instant::now())
			|| self.0.parent.as_ref().is_some_and(Context::is_done)
	}
}

impl Handler {
	/// Waits until every context attached to this handler has been dropped.
	pub async fn done(&mut self) {
		while self.alive.recv().await.is_some() {}
	}

	/// Cancels the context and waits for every holder to let go of it.
	pub async fn cancel(mut self) {
		self.token.cancel();
		self.done().await;
	}
}
