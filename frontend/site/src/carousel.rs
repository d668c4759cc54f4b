//! Index based project carousel.
//!
//! All operations take the current time in milliseconds and report the slide
//! that became active, if any. Rendering is left to the caller.

/// How long a transition runs, navigation is ignored meanwhile.
pub const TRANSITION_MS: f64 = 600.0;

/// Delay between automatic advances.
pub const AUTO_ADVANCE_MS: f64 = 5000.0;

/// Minimum horizontal travel for a touch to count as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
	len: usize,
	current: usize,
	locked_until: f64,
	next_advance_at: f64,
	paused: bool,
	touch_start: Option<f64>,
}

impl Carousel {
	/// Creates a carousel showing the first slide, which counts as a transition.
	pub fn new(len: usize, now: f64) -> Self {
		Self {
			len,
			current: 0,
			locked_until: if len == 0 { now } else { now + TRANSITION_MS },
			next_advance_at: now + AUTO_ADVANCE_MS,
			paused: false,
			touch_start: None,
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn current(&self) -> usize {
		self.current
	}

	pub fn is_paused(&self) -> bool {
		self.paused
	}

	pub fn is_locked(&self, now: f64) -> bool {
		now < self.locked_until
	}

	/// The track translation for the active slide, in percent.
	pub fn offset_percent(&self) -> f64 {
		-(self.current as f64 * 100.0)
	}

	pub fn next(&mut self, now: f64) -> Option<usize> {
		if self.is_empty() {
			return None;
		}

		self.navigate((self.current + 1) % self.len, now)
	}

	pub fn prev(&mut self, now: f64) -> Option<usize> {
		if self.is_empty() {
			return None;
		}

		self.navigate((self.current + self.len - 1) % self.len, now)
	}

	pub fn go_to(&mut self, index: usize, now: f64) -> Option<usize> {
		if index >= self.len {
			return None;
		}

		self.navigate(index, now)
	}

	fn navigate(&mut self, index: usize, now: f64) -> Option<usize> {
		if self.is_locked(now) {
			return None;
		}

		self.current = index;
		self.locked_until = now + TRANSITION_MS;
		self.next_advance_at = now + AUTO_ADVANCE_MS;

		Some(index)
	}

	/// Advances when the auto-advance is due.
	pub fn tick(&mut self, now: f64) -> Option<usize> {
		if self.paused || self.is_empty() || now < self.next_advance_at {
			return None;
		}

		let moved = self.next(now);
		if moved.is_none() {
			self.next_advance_at = now + AUTO_ADVANCE_MS;
		}

		moved
	}

	/// Milliseconds until [`Carousel::tick`] has work, `None` while paused.
	pub fn until_next_advance(&self, now: f64) -> Option<f64> {
		if self.paused || self.is_empty() {
			return None;
		}

		Some((self.next_advance_at - now).max(0.0))
	}

	pub fn pause(&mut self) {
		self.paused = true;
	}

	pub fn resume(&mut self, now: f64) {
		self.paused = false;
		self.next_advance_at = now + AUTO_ADVANCE_MS;
	}

	pub fn touch_start(&mut self, x: f64) {
		if self.is_empty() {
			return;
		}

		self.touch_start = Some(x);
		self.pause();
	}

	/// Swiping left moves forward, swiping right moves back.
	pub fn touch_end(&mut self, x: f64, now: f64) -> Option<usize> {
		if self.is_empty() {
			return None;
		}

		let start = self.touch_start.take();
		let moved = start.and_then(|start| {
			let travel = start - x;
			if travel.abs() <= SWIPE_THRESHOLD_PX {
				None
			} else if travel > 0.0 {
				self.next(now)
			} else {
				self.prev(now)
			}
		});

		self.resume(now);

		moved
	}

	pub fn key(&mut self, key: &str, now: f64) -> Option<usize> {
		match key {
			"ArrowLeft" => self.prev(now),
			"ArrowRight" => self.next(now),
			_ => None,
		}
	}

	/// The slide to re-render after a layout change.
	pub fn refresh(&self) -> Option<usize> {
		(!self.is_empty()).then_some(self.current)
	}
}

#[cfg(test)]
mod tests;
