/// How far the cursor outline trails the dot.
pub const OUTLINE_DELAY_MS: u32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn left(&self) -> String {
		format!("{}px", self.x)
	}

	pub fn top(&self) -> String {
		format!("{}px", self.y)
	}
}

/// The custom cursor. The dot sits on the pointer, the outline jumps to
/// wherever the pointer is once its delay after a move has passed.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
	pointer: Point,
	outline: Point,
	visible: bool,
}

impl Cursor {
	/// Returns where the dot goes.
	pub fn moved(&mut self, x: f64, y: f64) -> Point {
		self.pointer = Point { x, y };
		self.visible = true;
		self.pointer
	}

	/// Runs [`OUTLINE_DELAY_MS`] after each move, returns where the outline goes.
	pub fn catch_up(&mut self) -> Point {
		self.outline = self.pointer;
		self.outline
	}

	pub fn left_page(&mut self) {
		self.visible = false;
	}

	pub fn dot(&self) -> Point {
		self.pointer
	}

	pub fn outline(&self) -> Point {
		self.outline
	}

	pub fn visible(&self) -> bool {
		self.visible
	}

	pub fn opacity(&self) -> &'static str {
		if self.visible { "1" } else { "0" }
	}
}

/// Transform of a contact card's icon.
pub fn card_icon_transform(hovered: bool) -> &'static str {
	if hovered {
		"scale(1.2) rotate(8deg)"
	} else {
		"scale(1) rotate(0)"
	}
}
