//! The three effects the site uses, layered on the shared rules.

use std::f64::consts::TAU;

use log::debug;
use rand::rngs::StdRng;

use super::config::{MotionSettings, StarfieldConfig, TrailConfig, TwinkleConfig};
use super::effect::Effect;
use super::particle::{Bounds, Particle, ValueRange};
use super::render::{self, FieldFrame};
use super::simulation::{DriftRule, drift, prune_expired, wrap};
use super::surface::Surface;
use super::theme::Color;

const STAR_PHASE_STEP: f64 = 0.02;
const AURORA_OFFSET_STEP: f64 = 0.01;

fn scaled_count(count: usize, factor: f64) -> usize {
	(count as f64 * factor.clamp(0.0, 1.0)).round() as usize
}

/// Ambient background: twinkling stars, drifting nebula blobs and a wavy
/// aurora band. Regenerated from scratch whenever the surface resizes.
pub struct Starfield {
	config: StarfieldConfig,
	rng: StdRng,
	bounds: Bounds,
	/// Stars first, then nebula blobs.
	particles: Vec<Particle>,
	star_count: usize,
	aurora_offset: f64,
	aurora_time: f64,
}

impl Starfield {
	pub fn new(config: StarfieldConfig, rng: StdRng) -> Self {
		Self {
			config,
			rng,
			bounds: Bounds::default(),
			particles: Vec::new(),
			star_count: 0,
			aurora_offset: 0.0,
			aurora_time: 0.0,
		}
	}

	pub fn stars(&self) -> &[Particle] {
		&self.particles[..self.star_count]
	}

	pub fn nebula(&self) -> &[Particle] {
		&self.particles[self.star_count..]
	}

	fn star(&mut self) -> Particle {
		let cfg = &self.config;
		let rng = &mut self.rng;
		Particle {
			x: ValueRange::new(0.0, self.bounds.width).sample(rng),
			y: ValueRange::new(0.0, self.bounds.height).sample(rng),
			vx: cfg.star_speed.sample(rng),
			vy: cfg.star_speed.sample(rng),
			size: cfg.star_size.sample(rng),
			opacity: cfg.star_opacity.sample(rng),
			twinkle_speed: cfg.star_twinkle.sample(rng),
			phase: ValueRange::new(0.0, TAU).sample(rng),
			rotation: 0.0,
			created_at: 0.0,
			color: cfg.star_color,
		}
	}

	fn nebula_blob(&mut self) -> Particle {
		let cfg = &self.config;
		let rng = &mut self.rng;
		let channel = |range: &ValueRange, rng: &mut StdRng| range.sample(rng).clamp(0.0, 255.0) as u8;
		let color = Color::rgba(
			channel(&cfg.nebula_red, &mut *rng),
			channel(&cfg.nebula_green, &mut *rng),
			channel(&cfg.nebula_blue, &mut *rng),
			cfg.nebula_alpha,
		);
		Particle {
			x: ValueRange::new(0.0, self.bounds.width).sample(rng),
			y: ValueRange::new(0.0, self.bounds.height).sample(rng),
			vx: cfg.nebula_speed_x.sample(rng),
			vy: cfg.nebula_speed_y.sample(rng),
			size: cfg.nebula_size.sample(rng),
			opacity: 1.0,
			twinkle_speed: 0.0,
			phase: 0.0,
			rotation: 0.0,
			created_at: 0.0,
			color,
		}
	}
}

impl Effect for Starfield {
	fn name(&self) -> &'static str {
		"starfield"
	}

	fn motion(&self) -> &MotionSettings {
		&self.config.motion
	}

	fn populate(&mut self, bounds: Bounds, _now: f64) {
		self.bounds = bounds;
		self.particles.clear();
		self.star_count = 0;
		if bounds.is_empty() {
			return;
		}

		let density = if self.config.motion.low_performance {
			self.config.low_performance_density
		} else {
			1.0
		};
		let stars = scaled_count(self.config.star_count, density);
		let blobs = scaled_count(self.config.nebula_count, density);
		self.particles.reserve(stars + blobs);
		for _ in 0..stars {
			let p = self.star();
			self.particles.push(p);
		}
		for _ in 0..blobs {
			let p = self.nebula_blob();
			self.particles.push(p);
		}
		self.star_count = stars;
		debug!(
			"portfolio-fx: starfield populated {stars} stars, {blobs} nebula blobs at {}x{}",
			bounds.width, bounds.height
		);
	}

	fn resize(&mut self, bounds: Bounds, now: f64) {
		self.populate(bounds, now);
	}

	fn step(&mut self, _now: f64) {
		let star_rule = DriftRule {
			phase_step: STAR_PHASE_STEP,
			rotation_step: 0.0,
			opacity: self.config.star_opacity,
		};
		let nebula_rule = DriftRule {
			phase_step: 0.0,
			rotation_step: 0.0,
			opacity: ValueRange::fixed(1.0),
		};
		let (stars, nebula) = self.particles.split_at_mut(self.star_count);
		drift(stars, self.bounds, &star_rule);
		drift(nebula, self.bounds, &nebula_rule);
		self.aurora_offset += AURORA_OFFSET_STEP;
		self.aurora_time += 1.0;
	}

	fn render(&self, surface: &mut dyn Surface) {
		let aurora = self.config.aurora.then(|| {
			(
				render::aurora_outline(
					self.bounds,
					self.config.aurora_band,
					self.config.aurora_step,
					self.aurora_offset,
					self.aurora_time,
				),
				self.config.aurora_color,
			)
		});
		render::render_field(
			surface,
			&FieldFrame {
				backdrop: self.config.backdrop,
				stars: self.stars(),
				nebula: self.nebula(),
				aurora,
			},
		);
	}

	fn particles(&self) -> &[Particle] {
		&self.particles
	}

	fn release(&mut self) {
		self.particles = Vec::new();
		self.star_count = 0;
	}
}

/// Sparkles that pop in around the host, live for a fixed TTL and vanish.
///
/// Each step prunes expired sparkles first and then spawns at most one, so
/// the live set is bounded by `ceil(ttl / interval) + 1` however long it runs.
pub struct SparkleTrail {
	config: TrailConfig,
	rng: StdRng,
	bounds: Bounds,
	particles: Vec<Particle>,
	last_spawn: Option<f64>,
}

impl SparkleTrail {
	pub fn new(config: TrailConfig, rng: StdRng) -> Self {
		Self {
			config,
			rng,
			bounds: Bounds::default(),
			particles: Vec::new(),
			last_spawn: None,
		}
	}

	/// Effective spawn interval; low-performance mode spawns half as often.
	pub fn spawn_interval(&self) -> f64 {
		if self.config.motion.low_performance {
			self.config.spawn_interval_ms * 2.0
		} else {
			self.config.spawn_interval_ms
		}
	}

	fn sparkle(&mut self, now: f64) -> Particle {
		let cfg = &self.config;
		let rng = &mut self.rng;
		Particle {
			x: cfg.spawn_x.sample(rng) * self.bounds.width,
			y: cfg.spawn_y.sample(rng) * self.bounds.height,
			vx: 0.0,
			vy: 0.0,
			size: cfg.size.sample(rng),
			opacity: 1.0,
			twinkle_speed: 0.0,
			phase: 0.0,
			rotation: 0.0,
			created_at: now,
			color: cfg.color,
		}
	}
}

impl Effect for SparkleTrail {
	fn name(&self) -> &'static str {
		"sparkle-trail"
	}

	fn motion(&self) -> &MotionSettings {
		&self.config.motion
	}

	fn populate(&mut self, bounds: Bounds, _now: f64) {
		self.bounds = bounds;
		self.particles.clear();
		self.last_spawn = None;
	}

	fn resize(&mut self, bounds: Bounds, _now: f64) {
		self.bounds = bounds;
	}

	fn step(&mut self, now: f64) {
		prune_expired(&mut self.particles, now, self.config.ttl_ms);

		let duration = self.config.animation_ms.max(1.0);
		for p in &mut self.particles {
			let t = (p.age(now) / duration).clamp(0.0, 1.0);
			p.phase = t;
			p.rotation = 180.0 * t;
		}

		let due = self
			.last_spawn
			.is_none_or(|last| now - last >= self.spawn_interval());
		if due && !self.bounds.is_empty() {
			let p = self.sparkle(now);
			self.particles.push(p);
			self.last_spawn = Some(now);
		}
	}

	fn render(&self, surface: &mut dyn Surface) {
		render::render_trail(surface, &self.particles);
	}

	fn particles(&self) -> &[Particle] {
		&self.particles
	}

	fn release(&mut self) {
		self.particles = Vec::new();
		self.last_spawn = None;
	}
}

/// Glyphs drifting and twinkling over a fixed-size card.
///
/// A resize keeps the existing glyphs and only folds them into the new
/// bounds.
pub struct IconTwinkle {
	config: TwinkleConfig,
	rng: StdRng,
	bounds: Bounds,
	particles: Vec<Particle>,
}

impl IconTwinkle {
	pub fn new(config: TwinkleConfig, rng: StdRng) -> Self {
		Self {
			config,
			rng,
			bounds: Bounds::default(),
			particles: Vec::new(),
		}
	}

	fn glyph(&mut self) -> Particle {
		let cfg = &self.config;
		let rng = &mut self.rng;
		Particle {
			x: ValueRange::new(0.0, self.bounds.width).sample(rng),
			y: ValueRange::new(0.0, self.bounds.height).sample(rng),
			vx: cfg.speed.sample(rng),
			vy: cfg.speed.sample(rng),
			size: cfg.size.sample(rng),
			opacity: cfg.opacity.sample(rng),
			twinkle_speed: cfg.twinkle.sample(rng),
			phase: 0.0,
			rotation: ValueRange::new(0.0, 360.0).sample(rng),
			created_at: 0.0,
			color: cfg.color,
		}
	}
}

impl Effect for IconTwinkle {
	fn name(&self) -> &'static str {
		"icon-twinkle"
	}

	fn motion(&self) -> &MotionSettings {
		&self.config.motion
	}

	fn populate(&mut self, bounds: Bounds, _now: f64) {
		self.bounds = bounds;
		self.particles.clear();
		if bounds.is_empty() {
			return;
		}
		let count = if self.config.motion.low_performance {
			self.config.count.div_ceil(2)
		} else {
			self.config.count
		};
		self.particles.reserve(count);
		for _ in 0..count {
			let p = self.glyph();
			self.particles.push(p);
		}
	}

	fn resize(&mut self, bounds: Bounds, _now: f64) {
		if bounds.is_empty() {
			return;
		}
		self.bounds = bounds;
		for p in &mut self.particles {
			p.x = wrap(p.x, bounds.width);
			p.y = wrap(p.y, bounds.height);
		}
	}

	fn step(&mut self, _now: f64) {
		let rule = DriftRule {
			phase_step: 0.0,
			rotation_step: self.config.rotation_step,
			opacity: self.config.opacity,
		};
		drift(&mut self.particles, self.bounds, &rule);
	}

	fn render(&self, surface: &mut dyn Surface) {
		render::render_glyphs(surface, &self.particles);
	}

	fn particles(&self) -> &[Particle] {
		&self.particles
	}

	fn release(&mut self) {
		self.particles = Vec::new();
	}
}
