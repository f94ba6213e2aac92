//! Drawing-surface abstraction.
//!
//! The render step only talks to [`Surface`], which mirrors the subset of the
//! canvas 2D API the effects need. The browser backend forwards to a
//! `CanvasRenderingContext2d`; [`PixelSurface`](super::raster::PixelSurface)
//! rasterizes in software so effects can run headless.

use std::f64::consts::TAU;

use super::particle::Bounds;
use super::theme::Color;

/// How a surface is wiped at the start of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Backdrop {
	/// Erase to fully transparent.
	Transparent,
	/// Paint the whole surface with a colour. A translucent colour only
	/// partially covers the previous frame, leaving motion smears.
	Fill(Color),
}

/// Canvas-like immediate-mode drawing target.
///
/// Coordinates are in CSS pixels. `save`/`restore` scope both the transform
/// and the global alpha.
pub trait Surface {
	/// Current size in CSS pixels.
	fn bounds(&self) -> Bounds;
	/// Resizes the backing store. Contents are lost.
	fn resize(&mut self, bounds: Bounds);
	/// Wipes the surface, ignoring the current transform and alpha.
	fn clear(&mut self, backdrop: Backdrop);
	/// Pushes the transform and alpha.
	fn save(&mut self);
	/// Pops what the matching `save` pushed.
	fn restore(&mut self);
	/// Moves the origin.
	fn translate(&mut self, x: f64, y: f64);
	/// Radians, clockwise in screen space.
	fn rotate(&mut self, angle: f64);
	/// Scales subsequent drawing.
	fn scale(&mut self, sx: f64, sy: f64);
	/// Alpha multiplied into every fill, clamped to `[0, 1]`.
	fn set_global_alpha(&mut self, alpha: f64);
	/// Fills a circle given in the current local space.
	fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);
	/// Fills a closed polygon given in the current local space.
	fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color);
	/// Fills the sparkle glyph occupying `[0, SPARKLE_EXTENT]²` in local space.
	fn fill_sparkle(&mut self, color: Color);
}

/// Edge length of the sparkle glyph's native box.
pub const SPARKLE_EXTENT: f64 = 68.0;

/// Four-pointed sparkle outline: start point plus cubic segments
/// `(control1, control2, end)`.
pub const SPARKLE_START: (f64, f64) = (26.5, 25.5);
pub const SPARKLE_CURVES: [[(f64, f64); 3]; 8] = [
	[(19.0043, 33.3697), (0.0, 34.0), (0.0, 34.0)],
	[(0.0, 34.0), (19.1013, 35.3684), (26.5, 43.5)],
	[(33.234, 50.901), (34.0, 68.0), (34.0, 68.0)],
	[(34.0, 68.0), (36.9884, 50.7065), (44.5, 43.5)],
	[(51.6431, 36.647), (68.0, 34.0), (68.0, 34.0)],
	[(68.0, 34.0), (51.6947, 32.0939), (44.5, 25.5)],
	[(36.5605, 18.2235), (34.0, 0.0), (34.0, 0.0)],
	[(34.0, 0.0), (33.6591, 17.9837), (26.5, 25.5)],
];

/// Flattens the sparkle outline into a polygon with `per_curve` segments per
/// Bezier.
pub fn sparkle_outline(per_curve: usize) -> Vec<(f64, f64)> {
	let per_curve = per_curve.max(1);
	let mut points = Vec::with_capacity(SPARKLE_CURVES.len() * per_curve + 1);
	let mut from = SPARKLE_START;
	points.push(from);
	for [c1, c2, to] in SPARKLE_CURVES {
		for i in 1..=per_curve {
			let t = i as f64 / per_curve as f64;
			points.push(cubic(from, c1, c2, to, t));
		}
		from = to;
	}
	points
}

fn cubic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
	(
		a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
		a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
	)
}

/// Polygon approximating a circle, for backends without native arcs.
pub fn circle_outline(cx: f64, cy: f64, radius: f64, segments: usize) -> Vec<(f64, f64)> {
	let segments = segments.max(3);
	(0..segments)
		.map(|i| {
			let angle = TAU * i as f64 / segments as f64;
			(cx + radius * angle.cos(), cy + radius * angle.sin())
		})
		.collect()
}

/// 2D affine transform in canvas `(a, b, c, d, e, f)` order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
	pub a: f64,
	pub b: f64,
	pub c: f64,
	pub d: f64,
	pub e: f64,
	pub f: f64,
}

impl Affine {
	pub const IDENTITY: Affine = Affine {
		a: 1.0,
		b: 0.0,
		c: 0.0,
		d: 1.0,
		e: 0.0,
		f: 0.0,
	};

	pub fn translate(&mut self, x: f64, y: f64) {
		self.e += self.a * x + self.c * y;
		self.f += self.b * x + self.d * y;
	}

	pub fn scale(&mut self, sx: f64, sy: f64) {
		self.a *= sx;
		self.b *= sx;
		self.c *= sy;
		self.d *= sy;
	}

	pub fn rotate(&mut self, angle: f64) {
		let (sin, cos) = angle.sin_cos();
		let Affine { a, b, c, d, .. } = *self;
		self.a = a * cos + c * sin;
		self.b = b * cos + d * sin;
		self.c = c * cos - a * sin;
		self.d = d * cos - b * sin;
	}

	pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
		(
			self.a * x + self.c * y + self.e,
			self.b * x + self.d * y + self.f,
		)
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::FRAC_PI_2;

	use super::*;

	fn close(a: (f64, f64), b: (f64, f64)) -> bool {
		(a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
	}

	#[test]
	fn sparkle_outline_is_closed_and_in_box() {
		let outline = sparkle_outline(6);
		assert_eq!(outline.len(), 8 * 6 + 1);
		assert!(close(outline[0], *outline.last().unwrap()));
		for (x, y) in outline {
			assert!((0.0..=SPARKLE_EXTENT).contains(&x));
			assert!((0.0..=SPARKLE_EXTENT).contains(&y));
		}
	}

	#[test]
	fn affine_composes_like_canvas() {
		let mut t = Affine::IDENTITY;
		t.translate(10.0, 20.0);
		t.rotate(FRAC_PI_2);
		t.scale(2.0, 2.0);
		// Local +x becomes screen +y after a quarter turn.
		assert!(close(t.apply(1.0, 0.0), (10.0, 22.0)));
		assert!(close(t.apply(0.0, 1.0), (8.0, 20.0)));
	}
}
