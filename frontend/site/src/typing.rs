use std::time::Duration;

pub const TYPE_DELAY: Duration = Duration::from_millis(100);
pub const DELETE_DELAY: Duration = Duration::from_millis(50);
pub const PAUSE_DELAY: Duration = Duration::from_millis(2000);

pub const DEFAULT_PHRASES: &[&str] = &[
	"Data Analyst",
	"Tech Enthusiast",
	"Problem Solver",
	"AI Explorer",
	"Car Enthusiast",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
	/// What the element should show now
	pub text: String,
	/// How long to wait before the next step
	pub delay: Duration,
}

/// Types each phrase one character at a time, holds it, deletes it, then
/// moves on to the next phrase, forever.
#[derive(Debug, Clone)]
pub struct TypingLoop {
	phrases: Vec<Vec<char>>,
	phrase: usize,
	chars: usize,
	deleting: bool,
}

impl TypingLoop {
	/// Empty phrases are dropped, `None` if nothing is left.
	pub fn new<I, S>(phrases: I) -> Option<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let phrases: Vec<Vec<char>> = phrases
			.into_iter()
			.map(|phrase| phrase.as_ref().chars().collect::<Vec<_>>())
			.filter(|phrase| !phrase.is_empty())
			.collect();

		if phrases.is_empty() {
			return None;
		}

		Some(Self {
			phrases,
			phrase: 0,
			chars: 0,
			deleting: false,
		})
	}

	pub fn phrase_index(&self) -> usize {
		self.phrase
	}

	pub fn char_index(&self) -> usize {
		self.chars
	}

	pub fn is_deleting(&self) -> bool {
		self.deleting
	}

	pub fn step(&mut self) -> Step {
		let len = self.phrases[self.phrase].len();

		let delay = if self.deleting {
			self.chars -= 1;

			if self.chars == 0 {
				self.deleting = false;
				self.phrase = (self.phrase + 1) % self.phrases.len();
				TYPE_DELAY
			} else {
				DELETE_DELAY
			}
		} else {
			self.chars += 1;

			if self.chars == len {
				self.deleting = true;
				PAUSE_DELAY
			} else {
				TYPE_DELAY
			}
		};

		Step {
			text: self.text(),
			delay,
		}
	}

	fn text(&self) -> String {
		// After the last delete the phrase index has already moved on, but
		// nothing of either phrase is visible.
		self.phrases[self.phrase][..self.chars].iter().collect()
	}
}
