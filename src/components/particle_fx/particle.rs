//! Plain particle data shared by every effect.

use rand::Rng;
use serde::Deserialize;

use super::theme::Color;

/// A single animated dot or glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal position in CSS pixels.
	pub x: f64,
	/// Vertical position in CSS pixels.
	pub y: f64,
	/// Horizontal velocity, pixels per step.
	pub vx: f64,
	/// Vertical velocity, pixels per step.
	pub vy: f64,
	/// Render scale: circle diameter for dots, glyph edge length for sparkles.
	pub size: f64,
	/// Global alpha used when painting.
	pub opacity: f64,
	/// Signed opacity delta per step; the sign flips at either opacity bound.
	pub twinkle_speed: f64,
	/// Free-running phase. Trail sparkles store their life fraction here.
	pub phase: f64,
	/// Degrees.
	pub rotation: f64,
	/// Milliseconds on the driver's clock.
	pub created_at: f64,
	/// Fill colour.
	pub color: Color,
}

impl Particle {
	/// A motionless, fully opaque particle at the given position.
	pub fn at(x: f64, y: f64, size: f64, color: Color) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			size,
			opacity: 1.0,
			twinkle_speed: 0.0,
			phase: 0.0,
			rotation: 0.0,
			created_at: 0.0,
			color,
		}
	}

	/// Milliseconds since the particle was created.
	pub fn age(&self, now: f64) -> f64 {
		now - self.created_at
	}
}

/// Closed numeric range `[min, max]` a randomized attribute is drawn from.
///
/// Deserializes from either `[min, max]` or `{ "min": .., "max": .. }`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "RangeRepr")]
pub struct ValueRange {
	/// Inclusive lower bound.
	pub min: f64,
	/// Upper bound.
	pub max: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RangeRepr {
	Pair([f64; 2]),
	Named { min: f64, max: f64 },
}

impl From<RangeRepr> for ValueRange {
	fn from(repr: RangeRepr) -> Self {
		match repr {
			RangeRepr::Pair([min, max]) => ValueRange::new(min, max),
			RangeRepr::Named { min, max } => ValueRange::new(min, max),
		}
	}
}

impl ValueRange {
	/// Builds a range, swapping the bounds if they arrive inverted.
	pub const fn new(min: f64, max: f64) -> Self {
		if max < min {
			Self { min: max, max: min }
		} else {
			Self { min, max }
		}
	}

	/// Range that always samples `value`.
	pub const fn fixed(value: f64) -> Self {
		Self {
			min: value,
			max: value,
		}
	}

	/// Uniform draw from `[min, max)`. A degenerate range always yields `min`.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
		if self.max > self.min {
			rng.gen_range(self.min..self.max)
		} else {
			self.min
		}
	}

	/// Closed-interval membership.
	pub fn contains(&self, value: f64) -> bool {
		value >= self.min && value <= self.max
	}

	/// `max - min`.
	pub fn span(&self) -> f64 {
		self.max - self.min
	}
}

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Bounds {
	/// Bounds of the given size.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// True when particles cannot be placed: a side is zero, negative or not finite.
	pub fn is_empty(&self) -> bool {
		!(self.width.is_finite() && self.height.is_finite())
			|| self.width <= 0.0
			|| self.height <= 0.0
	}

	/// Half-open test against `[0, width) x [0, height)`.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= 0.0 && x < self.width && y >= 0.0 && y < self.height
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn samples_stay_in_range() {
		let mut rng = StdRng::seed_from_u64(7);
		let range = ValueRange::new(6.0, 18.0);
		for _ in 0..1000 {
			let v = range.sample(&mut rng);
			assert!((6.0..18.0).contains(&v));
		}
	}

	#[test]
	fn degenerate_range_returns_min() {
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(ValueRange::fixed(0.3).sample(&mut rng), 0.3);
	}

	#[test]
	fn inverted_bounds_are_swapped() {
		let range = ValueRange::new(1.0, -1.0);
		assert_eq!(range.min, -1.0);
		assert_eq!(range.max, 1.0);
	}

	#[test]
	fn deserializes_both_shapes() {
		let pair: ValueRange = serde_json::from_str("[0.5, 1.0]").unwrap();
		let named: ValueRange = serde_json::from_str(r#"{"min": 0.5, "max": 1.0}"#).unwrap();
		assert_eq!(pair, named);
	}

	#[test]
	fn empty_bounds() {
		assert!(Bounds::new(0.0, 600.0).is_empty());
		assert!(Bounds::new(800.0, f64::NAN).is_empty());
		assert!(!Bounds::new(800.0, 600.0).is_empty());
	}
}
