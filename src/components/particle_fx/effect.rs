//! The strategy seam between the generic driver and the presets.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::{EffectsConfig, MotionSettings};
use super::particle::{Bounds, Particle};
use super::presets::{IconTwinkle, SparkleTrail, Starfield};
use super::surface::Surface;

/// One visual effect: a particle factory, a step rule and a render rule.
///
/// The driver calls `populate` once a non-empty surface size is known,
/// then alternates `step` and `render` every frame. `render` takes `&self`:
/// painting never changes particle state.
pub trait Effect {
	/// Short identifier used in log lines.
	fn name(&self) -> &'static str;
	/// Scheduling flags from the effect's config.
	fn motion(&self) -> &MotionSettings;
	/// Builds the initial particle set for `bounds`.
	fn populate(&mut self, bounds: Bounds, now: f64);
	/// Reacts to a surface size change after the first `populate`.
	fn resize(&mut self, bounds: Bounds, now: f64);
	/// Advances the simulation by one step at time `now` (ms).
	fn step(&mut self, now: f64);
	/// Paints the current state onto `surface`.
	fn render(&self, surface: &mut dyn Surface);
	/// Live particles, in paint order.
	fn particles(&self) -> &[Particle];
	/// Drops all particle state.
	fn release(&mut self);
}

/// The effects the site ships with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
	/// Ambient starfield, nebula and aurora page background.
	Starfield,
	/// Sparkles popping in and out around a headline.
	SparkleTrail,
	/// Twinkling glyphs drifting over a content card.
	IconTwinkle,
}

impl Preset {
	/// Builds the effect seeded from OS entropy.
	pub fn build(self, config: &EffectsConfig) -> Box<dyn Effect> {
		self.build_with_rng(config, StdRng::from_entropy())
	}

	/// Builds the effect around a caller-supplied generator.
	pub fn build_with_rng(self, config: &EffectsConfig, rng: StdRng) -> Box<dyn Effect> {
		match self {
			Preset::Starfield => Box::new(Starfield::new(config.starfield.clone(), rng)),
			Preset::SparkleTrail => Box::new(SparkleTrail::new(config.sparkles.clone(), rng)),
			Preset::IconTwinkle => Box::new(IconTwinkle::new(config.twinkle.clone(), rng)),
		}
	}
}
