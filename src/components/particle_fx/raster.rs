//! Software RGBA8 rasterizer implementing [`Surface`].
//!
//! Used wherever there is no browser canvas. Polygons are filled with an
//! even-odd scanline pass sampled at pixel centres and composited
//! source-over; there is no anti-aliasing.

use super::particle::Bounds;
use super::surface::{Affine, Backdrop, Surface, circle_outline, sparkle_outline};
use super::theme::Color;

const CIRCLE_SEGMENTS: usize = 24;
const SPARKLE_SEGMENTS_PER_CURVE: usize = 6;

#[derive(Clone, Copy, Debug)]
struct DrawState {
	transform: Affine,
	alpha: f64,
}

impl Default for DrawState {
	fn default() -> Self {
		Self {
			transform: Affine::IDENTITY,
			alpha: 1.0,
		}
	}
}

/// An in-memory pixel buffer.
#[derive(Clone, Debug)]
pub struct PixelSurface {
	width: usize,
	height: usize,
	pixels: Vec<[u8; 4]>,
	state: DrawState,
	stack: Vec<DrawState>,
	sparkle: Vec<(f64, f64)>,
	draw_calls: u64,
}

impl PixelSurface {
	/// Transparent surface of `width` x `height` pixels.
	pub fn new(width: usize, height: usize) -> Self {
		Self {
			width,
			height,
			pixels: vec![[0; 4]; width * height],
			state: DrawState::default(),
			stack: Vec::new(),
			sparkle: sparkle_outline(SPARKLE_SEGMENTS_PER_CURVE),
			draw_calls: 0,
		}
	}

	/// Width in pixels.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> usize {
		self.height
	}

	/// Row-major RGBA pixels.
	pub fn pixels(&self) -> &[[u8; 4]] {
		&self.pixels
	}

	/// RGBA at `(x, y)`, or `None` outside the buffer.
	pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
		(x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
	}

	/// True when every pixel is fully transparent.
	pub fn is_blank(&self) -> bool {
		self.pixels.iter().all(|p| p[3] == 0)
	}

	/// Number of clear and fill operations issued since creation.
	pub fn draw_calls(&self) -> u64 {
		self.draw_calls
	}

	/// Depth of the `save` stack; zero between well-formed frames.
	pub fn save_depth(&self) -> usize {
		self.stack.len()
	}

	fn blend(&mut self, index: usize, color: Color, alpha: f64) {
		let src_a = (color.a * alpha).clamp(0.0, 1.0);
		if src_a <= 0.0 {
			return;
		}
		let dst = self.pixels[index];
		let dst_a = dst[3] as f64 / 255.0;
		let out_a = src_a + dst_a * (1.0 - src_a);
		let mix = |s: u8, d: u8| -> u8 {
			if out_a <= 0.0 {
				return 0;
			}
			let v = (s as f64 * src_a + d as f64 * dst_a * (1.0 - src_a)) / out_a;
			v.round().clamp(0.0, 255.0) as u8
		};
		self.pixels[index] = [
			mix(color.r, dst[0]),
			mix(color.g, dst[1]),
			mix(color.b, dst[2]),
			(out_a * 255.0).round() as u8,
		];
	}

	/// Even-odd scanline fill of a polygon already in device space.
	fn fill_device_polygon(&mut self, points: &[(f64, f64)], color: Color, alpha: f64) {
		if points.len() < 3 || self.width == 0 || self.height == 0 {
			return;
		}
		let (min_y, max_y) = points
			.iter()
			.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
				(lo.min(y), hi.max(y))
			});
		if !min_y.is_finite() || !max_y.is_finite() {
			return;
		}
		let first_row = (min_y - 0.5).ceil().max(0.0) as usize;
		let last_row = ((max_y - 0.5).floor() as i64).min(self.height as i64 - 1);
		if last_row < first_row as i64 {
			return;
		}

		let mut crossings: Vec<f64> = Vec::new();
		for row in first_row..=last_row as usize {
			let cy = row as f64 + 0.5;
			crossings.clear();
			for i in 0..points.len() {
				let (x0, y0) = points[i];
				let (x1, y1) = points[(i + 1) % points.len()];
				if (y0 <= cy && cy < y1) || (y1 <= cy && cy < y0) {
					crossings.push(x0 + (cy - y0) * (x1 - x0) / (y1 - y0));
				}
			}
			crossings.sort_by(|a, b| a.total_cmp(b));
			for span in crossings.chunks_exact(2) {
				let start = (span[0] - 0.5).ceil().max(0.0) as usize;
				let end = ((span[1] - 0.5).ceil() as i64).min(self.width as i64);
				for col in start as i64..end {
					self.blend(row * self.width + col as usize, color, alpha);
				}
			}
		}
	}
}

impl Surface for PixelSurface {
	fn bounds(&self) -> Bounds {
		Bounds::new(self.width as f64, self.height as f64)
	}

	fn resize(&mut self, bounds: Bounds) {
		let (w, h) = if bounds.is_empty() {
			(0, 0)
		} else {
			(bounds.width.round() as usize, bounds.height.round() as usize)
		};
		self.width = w;
		self.height = h;
		self.pixels = vec![[0; 4]; w * h];
	}

	fn clear(&mut self, backdrop: Backdrop) {
		self.draw_calls += 1;
		match backdrop {
			Backdrop::Transparent => self.pixels.fill([0; 4]),
			Backdrop::Fill(color) => {
				for i in 0..self.pixels.len() {
					self.blend(i, color, 1.0);
				}
			}
		}
	}

	fn save(&mut self) {
		self.stack.push(self.state);
	}

	fn restore(&mut self) {
		if let Some(state) = self.stack.pop() {
			self.state = state;
		}
	}

	fn translate(&mut self, x: f64, y: f64) {
		self.state.transform.translate(x, y);
	}

	fn rotate(&mut self, angle: f64) {
		self.state.transform.rotate(angle);
	}

	fn scale(&mut self, sx: f64, sy: f64) {
		self.state.transform.scale(sx, sy);
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.state.alpha = alpha.clamp(0.0, 1.0);
	}

	fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
		let outline = circle_outline(cx, cy, radius, CIRCLE_SEGMENTS);
		self.fill_polygon(&outline, color);
	}

	fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color) {
		self.draw_calls += 1;
		let transform = self.state.transform;
		let device: Vec<(f64, f64)> = points.iter().map(|&(x, y)| transform.apply(x, y)).collect();
		self.fill_device_polygon(&device, color, self.state.alpha);
	}

	fn fill_sparkle(&mut self, color: Color) {
		let outline = std::mem::take(&mut self.sparkle);
		self.fill_polygon(&outline, color);
		self.sparkle = outline;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_square_covers_its_pixels() {
		let mut s = PixelSurface::new(10, 10);
		s.fill_polygon(
			&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)],
			Color::rgb(255, 0, 0),
		);
		assert_eq!(s.pixel(2, 2), Some([255, 0, 0, 255]));
		assert_eq!(s.pixel(5, 5), Some([255, 0, 0, 255]));
		assert_eq!(s.pixel(6, 6), Some([0, 0, 0, 0]));
		assert_eq!(s.pixel(1, 3), Some([0, 0, 0, 0]));
	}

	#[test]
	fn restore_undoes_transform_and_alpha() {
		let mut s = PixelSurface::new(20, 20);
		s.save();
		s.translate(10.0, 10.0);
		s.set_global_alpha(0.0);
		s.restore();
		s.fill_polygon(
			&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
			Color::WHITE,
		);
		assert_eq!(s.pixel(1, 1), Some([255, 255, 255, 255]));
		assert_eq!(s.pixel(11, 11), Some([0, 0, 0, 0]));
		assert_eq!(s.save_depth(), 0);
	}

	#[test]
	fn translucent_fill_smears_instead_of_erasing() {
		let mut s = PixelSurface::new(4, 4);
		s.clear(Backdrop::Fill(Color::WHITE));
		s.clear(Backdrop::Fill(Color::rgba(0, 0, 0, 0.5)));
		let [r, _, _, a] = s.pixel(0, 0).unwrap();
		assert_eq!(a, 255);
		assert!(r > 100 && r < 155);
		s.clear(Backdrop::Transparent);
		assert!(s.is_blank());
	}

	#[test]
	fn sparkle_paints_its_centre() {
		let mut s = PixelSurface::new(68, 68);
		s.fill_sparkle(Color::WHITE);
		assert_eq!(s.pixel(34, 34), Some([255, 255, 255, 255]));
		assert_eq!(s.pixel(2, 2), Some([0, 0, 0, 0]));
	}

	#[test]
	fn clipped_polygon_is_harmless() {
		let mut s = PixelSurface::new(8, 8);
		s.fill_circle(-50.0, -50.0, 10.0, Color::WHITE);
		s.fill_circle(4.0, 4.0, 100.0, Color::WHITE);
		assert_eq!(s.pixel(7, 7), Some([255, 255, 255, 255]));
	}
}
