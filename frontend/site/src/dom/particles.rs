use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, EventTarget, HtmlCanvasElement};

use super::timer::TimerLoop;
use super::util::{self, register_events, Holder};
use crate::particles::{ParticleField, DEFAULT_PARTICLES};

const FRAME: Duration = Duration::from_millis(16);

pub struct ParticlesView {
	_timer: TimerLoop,
	_resize: Holder<EventTarget>,
}

fn fit(canvas: &HtmlCanvasElement) -> Result<(f64, f64), JsValue> {
	let (width, height) = util::viewport()?;
	canvas.set_width(width as u32);
	canvas.set_height(height as u32);
	Ok((width, height))
}

fn draw(context: &CanvasRenderingContext2d, field: &ParticleField) {
	context.clear_rect(0.0, 0.0, field.width(), field.height());

	for particle in field.particles() {
		context.begin_path();
		if context
			.arc(particle.x, particle.y, particle.size, 0.0, std::f64::consts::TAU)
			.is_ok()
		{
			context.set_fill_style_str(&particle.fill_style());
			context.fill();
		}
	}
}

impl ParticlesView {
	pub fn mount(document: &Document) -> Result<Option<Self>, JsValue> {
		let Some(canvas) = util::query::<HtmlCanvasElement>(document, "#particle-canvas")? else {
			return Ok(None);
		};

		let Some(context) = canvas
			.get_context("2d")?
			.and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			tracing::warn!("particle canvas has no 2d context");
			return Ok(None);
		};

		let (width, height) = fit(&canvas)?;
		let field = Rc::new(RefCell::new(ParticleField::new(
			DEFAULT_PARTICLES,
			width,
			height,
			&mut rand::thread_rng(),
		)));

		let window = util::window()?;
		let cleanup = register_events!(window, {
			"resize" => {
				let field = field.clone();
				move |_| match fit(&canvas) {
					Ok((width, height)) => field.borrow_mut().resize(width, height),
					Err(err) => tracing::warn!(error = ?err, "failed to resize particle canvas"),
				}
			},
		})?;

		let timer = TimerLoop::spawn(move || {
			let mut field = field.borrow_mut();
			field.update();
			draw(&context, &field);
			FRAME
		});

		Ok(Some(Self {
			_timer: timer,
			_resize: Holder::new(window.unchecked_into(), cleanup),
		}))
	}
}
