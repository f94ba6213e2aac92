//! Canvas particle effects.
//!
//! One particle model and one animation loop drive three presets:
//! - [`Preset::Starfield`]: twinkling stars, drifting nebula puffs and an
//!   aurora band behind the whole page
//! - [`Preset::SparkleTrail`]: short-lived sparkles popping around a headline
//! - [`Preset::IconTwinkle`]: rotating glyphs drifting over a content card
//!
//! The engine is host-agnostic. [`AnimationDriver`] talks to a [`Surface`],
//! an [`Environment`] and a [`FrameScheduler`]; the browser implementations
//! live in the `browser` module, and [`PixelSurface`] plus [`StaticEnvironment`] run
//! the same code in plain tests.
//!
//! # Example
//!
//! ```ignore
//! use portfolio_fx::{EffectCanvas, Preset};
//!
//! let (disabled, set_disabled) = signal(false);
//! view! {
//!     <EffectCanvas preset=Preset::Starfield disabled=disabled fullscreen=true />
//! }
//! ```

mod browser;
mod component;
mod config;
mod driver;
mod effect;
mod environment;
mod error;
mod particle;
mod perf;
mod presets;
mod raster;
mod render;
mod simulation;
mod surface;
mod theme;

pub use browser::{FrameRateWatch, watch_frame_rate};
pub use component::EffectCanvas;
pub use config::{EffectsConfig, MotionSettings, StarfieldConfig, TrailConfig, TwinkleConfig};
pub use driver::{AnimationDriver, DriverState, FrameScheduler};
pub use effect::{Effect, Preset};
pub use environment::{Environment, StaticEnvironment};
pub use error::{ConfigError, SurfaceError};
pub use particle::{Bounds, Particle, ValueRange};
pub use perf::{FrameRateMonitor, Verdict};
pub use raster::PixelSurface;
pub use simulation::trail_capacity;
pub use surface::{Backdrop, Surface};
pub use theme::Color;
