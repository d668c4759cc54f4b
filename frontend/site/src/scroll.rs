use std::collections::HashSet;
use std::hash::Hash;

pub const HEADER_ELEVATE_AFTER: f64 = 50.0;
pub const SCROLL_TO_TOP_AFTER: f64 = 300.0;
pub const HEADER_OFFSET: f64 = 80.0;

/// How far down the page the reader is, in percent.
pub fn scroll_progress(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
	let scrollable = document_height - viewport_height;
	if scrollable <= 0.0 {
		return 0.0;
	}

	(scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
	Flat,
	Elevated,
}

impl HeaderStyle {
	pub fn for_scroll(scroll_y: f64) -> Self {
		if scroll_y > HEADER_ELEVATE_AFTER {
			Self::Elevated
		} else {
			Self::Flat
		}
	}

	pub fn box_shadow(&self) -> &'static str {
		match self {
			Self::Flat => "none",
			Self::Elevated => "0 10px 30px -10px rgba(2, 12, 27, 0.7)",
		}
	}

	pub fn background(&self) -> &'static str {
		match self {
			Self::Flat => "rgba(15, 23, 42, 0.85)",
			Self::Elevated => "rgba(15, 23, 42, 0.95)",
		}
	}
}

pub fn scroll_to_top_visible(scroll_y: f64) -> bool {
	scroll_y > SCROLL_TO_TOP_AFTER
}

/// Where to scroll so a section lands just below the fixed header.
pub fn nav_target(section_offset_top: f64) -> f64 {
	(section_offset_top - HEADER_OFFSET).max(0.0)
}

/// Remembers which sections have been revealed, a section never hides again.
#[derive(Debug, Clone)]
pub struct RevealTracker<K> {
	visible: HashSet<K>,
}

impl<K> Default for RevealTracker<K> {
	fn default() -> Self {
		Self { visible: HashSet::new() }
	}
}

impl<K: Eq + Hash> RevealTracker<K> {
	/// True only the first time `key` intersects.
	pub fn observe(&mut self, key: K, intersecting: bool) -> bool {
		intersecting && self.visible.insert(key)
	}

	pub fn is_visible(&self, key: &K) -> bool {
		self.visible.contains(key)
	}
}
