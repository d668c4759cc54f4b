// Adapted from https://github.com/old-storyai/tracing-wasm, console output only.

use core::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, Layered, SubscriberExt};
use tracing_subscriber::registry::{LookupSpan, Registry};
use web_sys::console;

pub struct ConsoleLayer {
	max_level: tracing::Level,
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for ConsoleLayer {
	fn enabled(&self, metadata: &tracing::Metadata<'_>, _: Context<'_, S>) -> bool {
		metadata.level() <= &self.max_level
	}

	fn on_event(&self, event: &tracing::Event<'_>, _: Context<'_, S>) {
		let mut recorder = StringRecorder::default();
		event.record(&mut recorder);

		let meta = event.metadata();
		let level = meta.level();
		let origin = meta.module_path().unwrap_or_default();

		let console_fn = match *level {
			tracing::Level::TRACE | tracing::Level::DEBUG => console::debug_4,
			tracing::Level::INFO => console::info_4,
			tracing::Level::WARN => console::warn_4,
			tracing::Level::ERROR => console::error_4,
		};

		let color = match *level {
			tracing::Level::TRACE => "color: dodgerblue; background: #444",
			tracing::Level::DEBUG => "color: lawngreen; background: #444",
			tracing::Level::INFO => "color: whitesmoke; background: #444",
			tracing::Level::WARN => "color: orange; background: #444",
			tracing::Level::ERROR => "color: red; background: #444",
		};

		console_fn(
			&format!("%c{level}%c {origin}%c{recorder}").into(),
			&color.into(),
			&"color: gray; font-style: italic".into(),
			&"color: inherit".into(),
		);
	}
}

pub type LoggingInstance = Layered<ConsoleLayer, Registry>;

pub fn registry(max_level: tracing::Level) -> LoggingInstance {
	Registry::default().with(ConsoleLayer { max_level })
}

/// Does nothing when a global subscriber is already set.
pub fn set_as_global_default(max_level: tracing::Level) {
	tracing::subscriber::set_global_default(registry(max_level)).ok();
}

#[derive(Default)]
struct StringRecorder {
	display: String,
	is_following_args: bool,
}

impl Visit for StringRecorder {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			if self.display.is_empty() {
				self.display = format!("{value:?}");
			} else {
				self.display = format!("{value:?}\n{}", self.display);
			}

			return;
		}

		if self.is_following_args {
			self.display.push('\n');
		} else {
			self.display.push(' ');
			self.is_following_args = true;
		}

		write!(self.display, "{} = {:?};", field.name(), value).ok();
	}
}

impl fmt::Display for StringRecorder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.display.is_empty() {
			Ok(())
		} else {
			write!(f, " {}", self.display)
		}
	}
}
