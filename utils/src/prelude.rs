use std::future::Future;
use std::time::Duration;

use tokio::time::Timeout;

#[cfg(feature = "context")]
pub use crate::context::{Context, Handler};

/// Bounds any future with [`tokio::time::timeout`], mostly for tests and shutdown paths.
pub trait FutureTimeout: Future + Sized {
	#[inline(always)]
	fn timeout(self, duration: Duration) -> Timeout<Self> {
		tokio::time::timeout(duration, self)
	}
}

impl<F: Future> FutureTimeout for F {}
