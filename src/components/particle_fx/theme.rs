//! Colours used by the effect presets.
//!
//! Colours deserialize from CSS notation so the page config can carry the
//! same strings the stylesheet uses.

use serde::Deserialize;

use super::error::ConfigError;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque white.
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS colour string: `#rrggbb` when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#rrggbb`, `#rgb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		let s = input.trim();
		let invalid = || ConfigError::InvalidColor(input.to_string());

		if let Some(hex) = s.strip_prefix('#') {
			if !hex.is_ascii() {
				return Err(invalid());
			}
			let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| invalid());
			return match hex.len() {
				6 => Ok(Color::rgb(
					channel(&hex[0..2])?,
					channel(&hex[2..4])?,
					channel(&hex[4..6])?,
				)),
				3 => {
					let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
					Ok(Color::rgb(short(0)?, short(1)?, short(2)?))
				}
				_ => Err(invalid()),
			};
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))
			.and_then(|rest| rest.strip_suffix(')'))
			.ok_or_else(invalid)?;
		let parts: Vec<&str> = body.split(',').map(str::trim).collect();
		if parts.len() != 3 && parts.len() != 4 {
			return Err(invalid());
		}
		let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
		let alpha = match parts.get(3) {
			Some(p) => p.parse::<f64>().map_err(|_| invalid())?.clamp(0.0, 1.0),
			None => 1.0,
		};
		Ok(Color::rgba(
			channel(parts[0])?,
			channel(parts[1])?,
			channel(parts[2])?,
			alpha,
		))
	}
}

impl TryFrom<String> for Color {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Color::parse(&value)
	}
}

/// Site palette shared by the presets.
pub mod palette {
	use super::Color;

	/// Night-sky wash painted under the starfield every step.
	pub const NIGHT_SMEAR: Color = Color::rgba(5, 5, 20, 50.0 / 255.0);
	/// Dark olive aurora band.
	pub const AURORA: Color = Color::rgba(85, 107, 47, 100.0 / 255.0);
	/// Headline sparkle yellow.
	pub const SPARKLE: Color = Color::rgb(255, 255, 0);
	/// Soft cream used on the about card.
	pub const CREAM: Color = Color::rgb(255, 255, 200);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_and_functional_notation() {
		assert_eq!(Color::parse("#ffff00").unwrap(), Color::rgb(255, 255, 0));
		assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
		assert_eq!(
			Color::parse("rgba(255, 255, 200, 1)").unwrap(),
			Color::rgba(255, 255, 200, 1.0)
		);
		assert_eq!(Color::parse(" rgb(5,5,20) ").unwrap(), Color::rgb(5, 5, 20));
	}

	#[test]
	fn rejects_garbage() {
		assert!(Color::parse("olive").is_err());
		assert!(Color::parse("#12345").is_err());
		assert!(Color::parse("rgb(1, 2)").is_err());
		assert!(Color::parse("rgb(300, 0, 0)").is_err());
	}

	#[test]
	fn css_output_drops_alpha_when_opaque() {
		assert_eq!(Color::rgb(136, 160, 53).to_css(), "#88a035");
		assert_eq!(
			Color::rgba(1, 2, 3, 0.5).to_css(),
			"rgba(1, 2, 3, 0.5)"
		);
	}
}
