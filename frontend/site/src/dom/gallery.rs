use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent};

use super::util::{self, register_events, Holder};
use crate::gallery::{Gallery, LightboxItem, ALL};

struct Lightbox {
	root: Element,
	image: Option<HtmlImageElement>,
	caption: Option<Element>,
}

impl Lightbox {
	fn show(&self, item: Option<&LightboxItem>) -> Result<(), JsValue> {
		if let Some(item) = item {
			if let Some(image) = &self.image {
				image.set_src(&item.src);
				image.set_alt(&item.title);
			}

			if let Some(caption) = &self.caption {
				caption.set_inner_html(&item.caption_html());
			}
		}

		self.root.class_list().toggle_with_force("active", item.is_some())?;
		Ok(())
	}
}

fn item_of(element: &Element) -> Option<LightboxItem> {
	let image = element.query_selector("img").ok().flatten()?.dyn_into::<HtmlImageElement>().ok()?;
	let text = |selector: &str| {
		element
			.query_selector(selector)
			.ok()
			.flatten()
			.and_then(|node| node.text_content())
	};

	Some(LightboxItem {
		src: image.src(),
		title: element
			.get_attribute("data-title")
			.or_else(|| text("h3"))
			.unwrap_or_else(|| image.alt()),
		description: element
			.get_attribute("data-description")
			.or_else(|| text("p"))
			.unwrap_or_default(),
	})
}

pub struct GalleryView {
	_events: Vec<Holder<EventTarget>>,
}

type Shared = Rc<(RefCell<Gallery>, Option<Lightbox>)>;

fn close(shared: &Shared) {
	if shared.0.borrow_mut().close().is_some() {
		if let Some(lightbox) = &shared.1 {
			lightbox.show(None).ok();
		}
	}
}

impl GalleryView {
	pub fn mount(document: &Document) -> Result<Option<Self>, JsValue> {
		let items = util::query_all::<HtmlElement>(document, ".gallery-item")?;
		if items.is_empty() {
			return Ok(None);
		}

		let categories = items
			.iter()
			.map(|item| item.get_attribute("data-category").unwrap_or_else(|| ALL.to_string()))
			.collect();

		let lightbox = util::query::<Element>(document, ".lightbox")?
			.map(|root| -> Result<Lightbox, JsValue> {
				Ok(Lightbox {
					image: util::query_all_in::<HtmlImageElement>(&root, ".lightbox-content")?.into_iter().next(),
					caption: root.query_selector(".lightbox-caption")?,
					root,
				})
			})
			.transpose()?;

		let shared: Shared = Rc::new((RefCell::new(Gallery::new(categories)), lightbox));
		let items = Rc::new(items);
		let buttons = Rc::new(util::query_all::<Element>(document, ".filter-btn")?);

		let mut events = Vec::new();

		for button in buttons.iter() {
			let filter = button.get_attribute("data-filter").unwrap_or_else(|| ALL.to_string());
			let shared = shared.clone();
			let items = items.clone();
			let buttons = buttons.clone();
			let current = button.clone();

			let cleanup = register_events!(button, {
				"click" => move |_| {
					for button in buttons.iter() {
						button.class_list().toggle_with_force("active", *button == current).ok();
					}

					let visible = shared.0.borrow_mut().set_filter(&filter);
					for (item, visible) in items.iter().zip(visible) {
						item.style().set_property("display", if visible { "" } else { "none" }).ok();
					}

					tracing::debug!(filter = %filter, "gallery filtered");
				},
			})?;
			events.push(Holder::new(button.clone().unchecked_into(), cleanup));
		}

		if shared.1.is_none() {
			return Ok(Some(Self { _events: events }));
		}

		for item in items.iter() {
			let shared = shared.clone();
			let element: Element = item.clone().into();

			let cleanup = register_events!(item, {
				"click" => move |_| {
					let Some(opened) = item_of(&element) else {
						return;
					};

					let mut gallery = shared.0.borrow_mut();
					gallery.open(opened);
					if let Some(lightbox) = &shared.1 {
						lightbox.show(gallery.lightbox()).ok();
					}
				},
			})?;
			events.push(Holder::new(item.clone().unchecked_into(), cleanup));
		}

		if let Some(lightbox) = &shared.1 {
			let root = lightbox.root.clone();
			let cleanup = register_events!(root, {
				"click" => {
					let shared = shared.clone();
					let root = root.clone();
					move |event: web_sys::Event| {
						let on_backdrop = event
							.target()
							.and_then(|target| target.dyn_into::<Element>().ok())
							.is_some_and(|target| target == root || target.class_list().contains("lightbox-close"));

						if on_backdrop {
							close(&shared);
						}
					}
				},
			})?;
			events.push(Holder::new(root.unchecked_into(), cleanup));
		}

		let cleanup = register_events!(document, {
			"keydown" => move |event: web_sys::Event| {
				if event.dyn_ref::<KeyboardEvent>().is_some_and(|event| event.key() == "Escape") {
					close(&shared);
				}
			},
		})?;
		events.push(Holder::new(document.clone().unchecked_into(), cleanup));

		Ok(Some(Self { _events: events }))
	}
}
