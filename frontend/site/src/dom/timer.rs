use std::time::Duration;

use futures::future::{abortable, AbortHandle};
use gloo_timers::future::TimeoutFuture;

/// Runs `step` on the local executor, waiting for the duration it returns
/// between calls. The loop stops when the `TimerLoop` is dropped.
pub struct TimerLoop {
	handle: AbortHandle,
}

impl TimerLoop {
	pub fn spawn(mut step: impl FnMut() -> Duration + 'static) -> Self {
		let (task, handle) = abortable(async move {
			loop {
				let delay = step();
				TimeoutFuture::new(delay.as_millis().min(u32::MAX as u128) as u32).await;
			}
		});

		wasm_bindgen_futures::spawn_local(async move {
			task.await.ok();
		});

		Self { handle }
	}
}

impl Drop for TimerLoop {
	fn drop(&mut self) {
		self.handle.abort();
	}
}
