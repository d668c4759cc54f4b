use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use super::fetch;
use super::util::{self, register_events, Holder};
use crate::form::{endpoint, ContactForm, Field, Outcome};

const BANNER_MS: u32 = 5000;

struct Elements {
	form: HtmlFormElement,
	name: HtmlInputElement,
	email: HtmlInputElement,
	message: HtmlTextAreaElement,
	submit: Option<HtmlButtonElement>,
}

impl Elements {
	fn input(&self, field: Field) -> &Element {
		match field {
			Field::Name => &self.name,
			Field::Email => &self.email,
			Field::Message => &self.message,
		}
	}

	fn read(&self) -> ContactForm {
		ContactForm::from_fields(self.name.value(), self.email.value(), self.message.value())
	}

	fn clear_errors(&self) -> Result<(), JsValue> {
		for message in util::query_all_in::<Element>(&self.form, ".validation-message")? {
			message.remove();
		}

		for field in Field::ALL {
			self.input(field).class_list().remove_1("error")?;
		}

		Ok(())
	}

	/// Returns false when any field was flagged.
	fn show_errors(&self, document: &Document, form: &ContactForm) -> Result<bool, JsValue> {
		self.clear_errors()?;

		let errors = form.validate();
		for error in &errors {
			let input = self.input(error.field);
			input.class_list().add_1("error")?;

			let message = document.create_element("div")?;
			message.set_class_name("validation-message");
			message.set_text_content(Some(error.message));
			input.insert_adjacent_element("afterend", &message)?;
		}

		Ok(errors.is_empty())
	}

	fn set_sending(&self, sending: bool) {
		if let Some(submit) = &self.submit {
			submit.set_disabled(sending);
			submit.set_text_content(Some(if sending { "Sending..." } else { "Send Message" }));
		}
	}

	fn banner(&self, document: &Document, outcome: &Outcome) -> Result<HtmlElement, JsValue> {
		for old in util::query_all::<Element>(document, ".success-message, .error-message")? {
			old.remove();
		}

		let banner: HtmlElement = document.create_element("div")?.dyn_into()?;
		banner.set_class_name(outcome.banner_class());
		banner.set_text_content(Some(&outcome.banner_text()));
		self.form.insert_adjacent_element("beforebegin", &banner)?;

		Ok(banner)
	}
}

pub struct FormView {
	_submit: Holder<EventTarget>,
}

async fn submit(document: Document, elements: Rc<Elements>, form: ContactForm) {
	let body = match form.to_json() {
		Ok(body) => body,
		Err(err) => {
			tracing::error!(error = %err, "failed to encode contact form");
			return;
		}
	};

	elements.set_sending(true);

	let action = elements.form.get_attribute("action");
	let outcome = match fetch::post_json(endpoint(action.as_deref()), &body).await {
		Ok(response) => Outcome::from_response(response.status, &response.body),
		Err(err) => {
			tracing::warn!(error = ?err, "contact request failed");
			Outcome::transport(err.as_string().unwrap_or_else(|| "Network error".to_string()))
		}
	};

	elements.set_sending(false);

	if outcome == Outcome::Sent {
		elements.form.reset();
	}

	let banner = match elements.banner(&document, &outcome) {
		Ok(banner) => banner,
		Err(err) => {
			tracing::warn!(error = ?err, "failed to show contact banner");
			return;
		}
	};

	TimeoutFuture::new(BANNER_MS).await;
	banner.remove();
}

impl FormView {
	pub fn mount(document: &Document) -> Result<Option<Self>, JsValue> {
		let Some(form) = util::query::<HtmlFormElement>(document, "#contact-form")? else {
			return Ok(None);
		};

		let (Some(name), Some(email), Some(message)) = (
			util::query::<HtmlInputElement>(document, &format!("#{}", Field::Name.id()))?,
			util::query::<HtmlInputElement>(document, &format!("#{}", Field::Email.id()))?,
			util::query::<HtmlTextAreaElement>(document, &format!("#{}", Field::Message.id()))?,
		) else {
			tracing::warn!("contact form is missing inputs");
			return Ok(None);
		};

		let elements = Rc::new(Elements {
			submit: util::query_all_in::<HtmlButtonElement>(&form, ".submit-btn")?.into_iter().next(),
			form: form.clone(),
			name,
			email,
			message,
		});

		let document = document.clone();
		let cleanup = register_events!(form, {
			"submit" => move |event: web_sys::Event| {
				event.prevent_default();

				let contact = elements.read();
				match elements.show_errors(&document, &contact) {
					Ok(true) => wasm_bindgen_futures::spawn_local(submit(document.clone(), elements.clone(), contact)),
					Ok(false) => {}
					Err(err) => tracing::warn!(error = ?err, "failed to show validation errors"),
				}
			},
		})?;

		Ok(Some(Self {
			_submit: Holder::new(form.unchecked_into(), cleanup),
		}))
	}
}
