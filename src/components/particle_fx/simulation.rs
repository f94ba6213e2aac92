//! Per-step update rules shared by the effect presets.
//!
//! Every rule mutates particles in place and is deterministic given its
//! inputs; randomness only enters through the factories that create
//! particles.

use super::particle::{Bounds, Particle, ValueRange};

/// Wraps `value` into `[0, bound)`. A non-positive bound collapses to 0.
pub fn wrap(value: f64, bound: f64) -> f64 {
	if bound <= 0.0 || !bound.is_finite() || !value.is_finite() {
		return 0.0;
	}
	let wrapped = value.rem_euclid(bound);
	// rem_euclid of a tiny negative value can round up to `bound` itself.
	if wrapped >= bound { 0.0 } else { wrapped }
}

/// Advances `value` by `speed`, bouncing between `lo` and `hi`.
///
/// Crossing a bound pins the value there and points `speed` back inside, so
/// the value never leaves `[lo, hi]` and the oscillation never stalls.
pub fn ping_pong(value: &mut f64, speed: &mut f64, lo: f64, hi: f64) {
	let next = *value + *speed;
	if next > hi {
		*value = hi;
		*speed = -speed.abs();
	} else if next < lo {
		*value = lo;
		*speed = speed.abs();
	} else {
		*value = next;
	}
}

/// Fixed per-step increments for ambient (wrapping) fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftRule {
	pub phase_step: f64,
	/// Degrees per step.
	pub rotation_step: f64,
	/// Ping-pong bounds for opacity.
	pub opacity: ValueRange,
}

/// One ambient step: integrate, wrap, spin and twinkle every particle.
pub fn drift(particles: &mut [Particle], bounds: Bounds, rule: &DriftRule) {
	for p in particles.iter_mut() {
		p.x = wrap(p.x + p.vx, bounds.width);
		p.y = wrap(p.y + p.vy, bounds.height);
		p.phase += rule.phase_step;
		p.rotation = (p.rotation + rule.rotation_step).rem_euclid(360.0);
		ping_pong(
			&mut p.opacity,
			&mut p.twinkle_speed,
			rule.opacity.min,
			rule.opacity.max,
		);
	}
}

/// Drops every particle older than `ttl` milliseconds.
pub fn prune_expired(particles: &mut Vec<Particle>, now: f64, ttl: f64) {
	particles.retain(|p| p.age(now) <= ttl);
}

/// Upper bound on live trail particles for a given TTL and spawn interval.
pub fn trail_capacity(ttl: f64, spawn_interval: f64) -> usize {
	if spawn_interval <= 0.0 {
		return 1;
	}
	(ttl / spawn_interval).ceil().max(0.0) as usize + 1
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_fx::theme::Color;

	#[test]
	fn wrap_reenters_from_opposite_edge() {
		assert_eq!(wrap(801.0, 800.0), 1.0);
		assert_eq!(wrap(-1.0, 800.0), 799.0);
		assert_eq!(wrap(800.0, 800.0), 0.0);
		assert_eq!(wrap(5.0, 0.0), 0.0);
	}

	#[test]
	fn wrap_never_returns_the_bound() {
		let v = wrap(-1e-17, 800.0);
		assert!((0.0..800.0).contains(&v));
	}

	#[test]
	fn ping_pong_reverses_at_both_bounds() {
		let (mut value, mut speed) = (0.99, 0.02);
		ping_pong(&mut value, &mut speed, 0.5, 1.0);
		assert_eq!(value, 1.0);
		assert!(speed < 0.0);

		let (mut value, mut speed) = (0.51, -0.02);
		ping_pong(&mut value, &mut speed, 0.5, 1.0);
		assert_eq!(value, 0.5);
		assert!(speed > 0.0);
	}

	#[test]
	fn ping_pong_keeps_moving() {
		let (mut value, mut speed) = (0.75, 0.025);
		let mut seen_low = false;
		let mut seen_high = false;
		for _ in 0..200 {
			ping_pong(&mut value, &mut speed, 0.5, 1.0);
			assert!((0.5..=1.0).contains(&value));
			seen_low |= value == 0.5;
			seen_high |= value == 1.0;
		}
		assert!(seen_low && seen_high);
	}

	#[test]
	fn drift_wraps_rotation() {
		let mut particles = vec![Particle::at(10.0, 10.0, 4.0, Color::WHITE)];
		particles[0].rotation = 359.9;
		let rule = DriftRule {
			phase_step: 0.02,
			rotation_step: 0.2,
			opacity: ValueRange::new(0.0, 1.0),
		};
		drift(&mut particles, Bounds::new(100.0, 100.0), &rule);
		assert!(particles[0].rotation < 1.0);
		assert!((particles[0].phase - 0.02).abs() < 1e-12);
	}

	#[test]
	fn prune_keeps_particles_at_exact_ttl() {
		let mut particles = vec![Particle::at(0.0, 0.0, 1.0, Color::WHITE)];
		prune_expired(&mut particles, 750.0, 750.0);
		assert_eq!(particles.len(), 1);
		prune_expired(&mut particles, 750.5, 750.0);
		assert!(particles.is_empty());
	}

	#[test]
	fn capacity_formula() {
		assert_eq!(trail_capacity(750.0, 350.0), 4);
		assert_eq!(trail_capacity(700.0, 350.0), 3);
	}
}
