//! Render rules.
//!
//! Every function here reads particle state and paints it; none of them
//! mutate a particle. Each particle is drawn inside its own
//! `save`/`restore` pair so transforms and alpha never bleed into the next.

use std::f64::consts::PI;

use super::particle::{Bounds, Particle, ValueRange};
use super::surface::{Backdrop, SPARKLE_EXTENT, Surface};
use super::theme::Color;

/// Paints a particle as a filled circle of diameter `size`.
pub fn draw_dot(surface: &mut dyn Surface, p: &Particle) {
	if p.size <= 0.0 || p.opacity <= 0.0 {
		return;
	}
	surface.save();
	surface.set_global_alpha(p.opacity);
	surface.fill_circle(p.x, p.y, p.size / 2.0, p.color);
	surface.restore();
}

/// Paints the sparkle glyph centred on the particle, `size` pixels across.
pub fn draw_sparkle(surface: &mut dyn Surface, p: &Particle, size: f64) {
	if size <= 0.0 || p.opacity <= 0.0 {
		return;
	}
	let scale = size / SPARKLE_EXTENT;
	surface.save();
	surface.translate(p.x, p.y);
	surface.rotate(p.rotation.to_radians());
	surface.scale(scale, scale);
	surface.translate(-SPARKLE_EXTENT / 2.0, -SPARKLE_EXTENT / 2.0);
	surface.set_global_alpha(p.opacity);
	surface.fill_sparkle(p.color);
	surface.restore();
}

/// Grow-then-shrink curve for a sparkle's life fraction `t` in `[0, 1]`.
pub fn pop_scale(t: f64) -> f64 {
	(PI * t.clamp(0.0, 1.0)).sin().max(0.0)
}

/// Full-clear frame of glyphs at their own size.
pub fn render_glyphs(surface: &mut dyn Surface, particles: &[Particle]) {
	surface.clear(Backdrop::Transparent);
	for p in particles {
		draw_sparkle(surface, p, p.size);
	}
}

/// Full-clear frame of short-lived sparkles scaled by their life fraction.
pub fn render_trail(surface: &mut dyn Surface, particles: &[Particle]) {
	surface.clear(Backdrop::Transparent);
	for p in particles {
		draw_sparkle(surface, p, p.size * pop_scale(p.phase));
	}
}

/// Normalized aurora height in `[0, 1]` at horizontal offset `x_off`.
pub fn aurora_wave(x_off: f64, time: f64) -> f64 {
	0.5 + 0.25 * (x_off * 3.0 + time * 0.03).sin() + 0.25 * (x_off * 1.3 - time * 0.017).sin()
}

/// Closed outline of the aurora band hanging from the top edge.
pub fn aurora_outline(
	bounds: Bounds,
	band: ValueRange,
	step: f64,
	offset: f64,
	time: f64,
) -> Vec<(f64, f64)> {
	const OVERHANG: f64 = 50.0;
	let step = if step > 0.0 { step } else { 10.0 };
	let mut points = Vec::new();
	let mut x = -OVERHANG;
	let mut x_off = offset;
	while x <= bounds.width + OVERHANG {
		points.push((x, band.min + band.span() * aurora_wave(x_off, time)));
		x += step;
		x_off += 0.05;
	}
	points.push((bounds.width + OVERHANG, 0.0));
	points.push((-OVERHANG, 0.0));
	points
}

/// Everything the ambient background paints in one frame.
pub struct FieldFrame<'a> {
	pub backdrop: Color,
	pub stars: &'a [Particle],
	pub nebula: &'a [Particle],
	pub aurora: Option<(Vec<(f64, f64)>, Color)>,
}

/// Smear-clears, then paints stars, nebula blobs and the aurora band.
pub fn render_field(surface: &mut dyn Surface, frame: &FieldFrame<'_>) {
	surface.clear(Backdrop::Fill(frame.backdrop));
	for p in frame.stars {
		draw_dot(surface, p);
	}
	for p in frame.nebula {
		draw_dot(surface, p);
	}
	if let Some((outline, color)) = &frame.aurora {
		surface.save();
		surface.fill_polygon(outline, *color);
		surface.restore();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_fx::raster::PixelSurface;

	#[test]
	fn pop_scale_peaks_midway() {
		assert_eq!(pop_scale(0.0), 0.0);
		assert!((pop_scale(0.5) - 1.0).abs() < 1e-12);
		assert!(pop_scale(1.0) < 1e-12);
	}

	#[test]
	fn aurora_stays_inside_band() {
		let band = ValueRange::new(50.0, 150.0);
		let outline = aurora_outline(Bounds::new(400.0, 300.0), band, 10.0, 0.3, 42.0);
		let wave = &outline[..outline.len() - 2];
		assert_eq!(wave.len(), 51);
		assert!(wave.iter().all(|&(_, y)| band.contains(y)));
	}

	#[test]
	fn glyph_frame_leaves_no_state_behind() {
		let mut s = PixelSurface::new(40, 40);
		let mut p = Particle::at(20.0, 20.0, 16.0, Color::WHITE);
		p.opacity = 0.6;
		p.rotation = 45.0;
		render_glyphs(&mut s, &[p.clone(), p]);
		assert_eq!(s.save_depth(), 0);
		assert!(!s.is_blank());
	}
}
