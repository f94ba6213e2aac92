//! Effect configuration.
//!
//! Every struct uses `#[serde(default)]`, so the page only needs to spell out
//! the values it wants to change:
//!
//! ```json
//! { "starfield": { "star_count": 200, "motion": { "low_performance": true } },
//!   "sparkles": { "color": "#bbcf64" } }
//! ```

use serde::Deserialize;

use super::error::ConfigError;
use super::particle::ValueRange;
use super::theme::{Color, palette};

/// Scheduling flags common to all effects.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
	/// Cap on simulation steps per second. `None` follows the display.
	pub target_fps: Option<f64>,
	/// Trade density for CPU: fewer particles, slower spawning.
	pub low_performance: bool,
	/// Never animate; the surface stays in its initial cleared state.
	pub disabled: bool,
}

/// Ambient starfield, nebula and aurora background.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
	/// Scheduling flags; the starfield caps itself at 30 steps per second.
	pub motion: MotionSettings,
	/// Stars at full density.
	pub star_count: usize,
	/// Star diameter in pixels.
	pub star_size: ValueRange,
	/// Stars are static by default; a non-zero range makes them drift.
	pub star_speed: ValueRange,
	/// Bounds the star opacity bounces between.
	pub star_opacity: ValueRange,
	/// Opacity change per step.
	pub star_twinkle: ValueRange,
	/// Star colour.
	pub star_color: Color,
	/// Nebula blobs at full density.
	pub nebula_count: usize,
	/// Blob diameter in pixels.
	pub nebula_size: ValueRange,
	/// Horizontal blob velocity, pixels per step.
	pub nebula_speed_x: ValueRange,
	/// Vertical blob velocity, pixels per step.
	pub nebula_speed_y: ValueRange,
	/// Red channel of each blob's tint.
	pub nebula_red: ValueRange,
	/// Green channel of each blob's tint.
	pub nebula_green: ValueRange,
	/// Blue channel of each blob's tint.
	pub nebula_blue: ValueRange,
	/// Alpha of every blob.
	pub nebula_alpha: f64,
	/// Whether to paint the aurora band.
	pub aurora: bool,
	/// Aurora fill.
	pub aurora_color: Color,
	/// Vertical extent of the wavy lower edge, in pixels from the top.
	pub aurora_band: ValueRange,
	/// Horizontal distance between aurora vertices, in pixels.
	pub aurora_step: f64,
	/// Backdrop painted under each frame; translucent to leave trails.
	pub backdrop: Color,
	/// Count multiplier applied in low-performance mode.
	pub low_performance_density: f64,
}

impl Default for StarfieldConfig {
	fn default() -> Self {
		Self {
			motion: MotionSettings {
				target_fps: Some(30.0),
				..MotionSettings::default()
			},
			star_count: 350,
			star_size: ValueRange::new(1.0, 2.2),
			star_speed: ValueRange::fixed(0.0),
			star_opacity: ValueRange::new(0.4, 1.0),
			star_twinkle: ValueRange::new(0.004, 0.012),
			star_color: Color::WHITE,
			nebula_count: 80,
			nebula_size: ValueRange::new(80.0, 200.0),
			nebula_speed_x: ValueRange::new(-0.2, 0.2),
			nebula_speed_y: ValueRange::new(-0.1, 0.1),
			nebula_red: ValueRange::new(70.0, 110.0),
			nebula_green: ValueRange::new(90.0, 140.0),
			nebula_blue: ValueRange::new(60.0, 90.0),
			nebula_alpha: 20.0 / 255.0,
			aurora: true,
			aurora_color: palette::AURORA,
			aurora_band: ValueRange::new(50.0, 150.0),
			aurora_step: 10.0,
			backdrop: palette::NIGHT_SMEAR,
			low_performance_density: 0.4,
		}
	}
}

/// Short-lived sparkles emitted around a piece of content.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
	/// Scheduling flags.
	pub motion: MotionSettings,
	/// Minimum time between two spawns.
	pub spawn_interval_ms: f64,
	/// Lifetime of one sparkle.
	pub ttl_ms: f64,
	/// Grow, shrink and half-turn duration of one sparkle.
	pub animation_ms: f64,
	/// Peak sparkle size in pixels.
	pub size: ValueRange,
	/// Sparkle colour.
	pub color: Color,
	/// Horizontal spawn band as a fraction of the host width.
	pub spawn_x: ValueRange,
	/// Vertical spawn band as a fraction of the host height.
	pub spawn_y: ValueRange,
}

impl Default for TrailConfig {
	fn default() -> Self {
		Self {
			motion: MotionSettings::default(),
			spawn_interval_ms: 350.0,
			ttl_ms: 750.0,
			animation_ms: 700.0,
			size: ValueRange::new(10.0, 20.0),
			color: palette::SPARKLE,
			spawn_x: ValueRange::new(-0.1, 1.1),
			spawn_y: ValueRange::new(-0.1, 0.5),
		}
	}
}

/// Twinkling, slowly drifting glyphs over a content card.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TwinkleConfig {
	/// Scheduling flags.
	pub motion: MotionSettings,
	/// Glyphs at full density.
	pub count: usize,
	/// Glyph edge length in pixels.
	pub size: ValueRange,
	/// Per-axis velocity, pixels per step.
	pub speed: ValueRange,
	/// Bounds the glyph opacity bounces between.
	pub opacity: ValueRange,
	/// Opacity change per step.
	pub twinkle: ValueRange,
	/// Degrees per step.
	pub rotation_step: f64,
	/// Glyph colour.
	pub color: Color,
}

impl Default for TwinkleConfig {
	fn default() -> Self {
		Self {
			motion: MotionSettings::default(),
			count: 40,
			size: ValueRange::new(6.0, 18.0),
			speed: ValueRange::new(-0.1, 0.1),
			opacity: ValueRange::new(0.5, 1.0),
			twinkle: ValueRange::new(0.01, 0.025),
			rotation_step: 0.2,
			color: palette::CREAM,
		}
	}
}

/// Configuration for every effect on the page.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
	/// Page background.
	pub starfield: StarfieldConfig,
	/// Headline sparkle trail.
	pub sparkles: TrailConfig,
	/// Content-card glyphs.
	pub twinkle: TwinkleConfig,
}

impl EffectsConfig {
	/// Parses a (possibly partial) JSON settings object.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_yields_defaults() {
		let config = EffectsConfig::from_json("{}").unwrap();
		assert_eq!(config, EffectsConfig::default());
	}

	#[test]
	fn partial_overrides_keep_other_defaults() {
		let config = EffectsConfig::from_json(
			r##"{
				"starfield": { "star_count": 12, "motion": { "low_performance": true } },
				"sparkles": { "color": "#bbcf64", "ttl_ms": 500 },
				"twinkle": { "size": [2, 4], "motion": { "disabled": true } }
			}"##,
		)
		.unwrap();
		assert_eq!(config.starfield.star_count, 12);
		assert!(config.starfield.motion.low_performance);
		assert_eq!(config.starfield.motion.target_fps, None);
		assert_eq!(config.starfield.nebula_count, 80);
		assert_eq!(config.sparkles.color, Color::rgb(0xbb, 0xcf, 0x64));
		assert_eq!(config.sparkles.ttl_ms, 500.0);
		assert_eq!(config.sparkles.spawn_interval_ms, 350.0);
		assert_eq!(config.twinkle.size, ValueRange::new(2.0, 4.0));
		assert!(config.twinkle.motion.disabled);
	}

	#[test]
	fn bad_color_is_an_error() {
		let err = EffectsConfig::from_json(r#"{ "sparkles": { "color": "sparkly" } }"#);
		assert!(err.is_err());
	}
}
