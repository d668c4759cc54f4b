use std::cell::RefCell;

use wasm_bindgen::prelude::*;

mod carousel;
mod fetch;
mod form;
mod gallery;
mod particles;
mod pointer;
mod scroll;
mod timer;
mod typing;
mod util;

/// Everything mounted on the page, dropping it detaches every listener and stops every loop.
struct Site {
	_carousel: Option<carousel::CarouselView>,
	_typing: Option<typing::TypingView>,
	_particles: Option<particles::ParticlesView>,
	_scroll: scroll::ScrollView,
	_form: Option<form::FormView>,
	_gallery: Option<gallery::GalleryView>,
	_cursor: Option<pointer::CursorView>,
	_cards: pointer::CardHoverView,
	_page_load: Option<pointer::PageLoadView>,
}

impl Site {
	fn mount() -> Result<Self, JsValue> {
		let document = util::document()?;

		Ok(Self {
			_carousel: carousel::CarouselView::mount(&document)?,
			_typing: typing::TypingView::mount(&document)?,
			_particles: particles::ParticlesView::mount(&document)?,
			_scroll: scroll::ScrollView::mount(&document)?,
			_form: form::FormView::mount(&document)?,
			_gallery: gallery::GalleryView::mount(&document)?,
			_cursor: pointer::CursorView::mount(&document)?,
			_cards: pointer::CardHoverView::mount(&document)?,
			_page_load: pointer::PageLoadView::mount(&document)?,
		})
	}
}

thread_local! {
	static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start, skip_typescript)]
pub fn main() -> Result<(), JsValue> {
	console_error_panic_hook::set_once();

	crate::tracing_wasm::set_as_global_default(tracing::Level::INFO);

	let site = Site::mount()?;
	SITE.with(|cell| cell.replace(Some(site)));

	tracing::info!("site mounted");

	Ok(())
}

/// Detaches everything `main` mounted.
#[wasm_bindgen]
pub fn teardown() {
	if let Some(site) = SITE.with(|cell| cell.take()) {
		drop(site);
		tracing::info!("site unmounted");
	}
}
