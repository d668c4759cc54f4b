use rand::Rng;

pub const DEFAULT_PARTICLES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub speed_x: f64,
	pub speed_y: f64,
	pub opacity: f64,
}

impl Particle {
	fn spawn(rng: &mut impl Rng, width: f64, height: f64) -> Self {
		Self {
			x: rng.gen::<f64>() * width,
			y: rng.gen::<f64>() * height,
			size: rng.gen_range(0.5..2.5),
			speed_x: rng.gen_range(-0.25..0.25),
			speed_y: rng.gen_range(-0.25..0.25),
			opacity: rng.gen_range(0.2..0.7),
		}
	}

	pub fn fill_style(&self) -> String {
		format!("rgba(0, 217, 255, {})", self.opacity)
	}
}

/// Particles drifting across a canvas, leaving one edge re-enters at the opposite one.
#[derive(Debug, Clone)]
pub struct ParticleField {
	width: f64,
	height: f64,
	particles: Vec<Particle>,
}

impl ParticleField {
	pub fn new(count: usize, width: f64, height: f64, rng: &mut impl Rng) -> Self {
		Self {
			width,
			height,
			particles: (0..count).map(|_| Particle::spawn(rng, width, height)).collect(),
		}
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn update(&mut self) {
		for particle in &mut self.particles {
			particle.x += particle.speed_x;
			particle.y += particle.speed_y;

			if particle.x > self.width {
				particle.x = 0.0;
			} else if particle.x < 0.0 {
				particle.x = self.width;
			}

			if particle.y > self.height {
				particle.y = 0.0;
			} else if particle.y < 0.0 {
				particle.y = self.height;
			}
		}
	}

	/// Existing particles keep their positions, the next update wraps any that are now outside.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
