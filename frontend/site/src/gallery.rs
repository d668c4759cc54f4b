pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxItem {
	pub src: String,
	pub title: String,
	pub description: String,
}

impl LightboxItem {
	pub fn caption_html(&self) -> String {
		format!("<strong>{}</strong><br>{}", escape(&self.title), escape(&self.description))
	}
}

fn escape(value: &str) -> String {
	value
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
}

/// Category filter and lightbox state for the gallery grid.
#[derive(Debug, Clone)]
pub struct Gallery {
	categories: Vec<String>,
	filter: String,
	open: Option<LightboxItem>,
}

impl Gallery {
	pub fn new(categories: Vec<String>) -> Self {
		Self {
			categories,
			filter: ALL.to_string(),
			open: None,
		}
	}

	pub fn filter(&self) -> &str {
		&self.filter
	}

	/// Returns the visibility of every item under the new filter.
	pub fn set_filter(&mut self, filter: &str) -> Vec<bool> {
		self.filter = filter.to_string();
		(0..self.categories.len()).map(|index| self.is_visible(index)).collect()
	}

	pub fn is_visible(&self, index: usize) -> bool {
		self.categories
			.get(index)
			.is_some_and(|category| self.filter == ALL || *category == self.filter)
	}

	pub fn open(&mut self, item: LightboxItem) {
		self.open = Some(item);
	}

	pub fn close(&mut self) -> Option<LightboxItem> {
		self.open.take()
	}

	pub fn lightbox(&self) -> Option<&LightboxItem> {
		self.open.as_ref()
	}
}
