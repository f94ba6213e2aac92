//! Inputs the driver consults before animating.
//!
//! The driver never queries globals itself; everything it needs from its
//! host comes through one [`Environment`] value.

use super::particle::Bounds;

/// Read-only view of the host's current conditions.
pub trait Environment {
	/// Current surface size in CSS pixels.
	fn surface_size(&self) -> Bounds;
	/// The user asked the OS for less motion.
	fn prefers_reduced_motion(&self) -> bool;
	/// False while the page is backgrounded.
	fn is_visible(&self) -> bool;
	/// Global "disable all animations" switch owned by the page shell.
	fn animations_disabled(&self) -> bool;

	/// Whether any signal currently forbids animating.
	fn motion_blocked(&self) -> bool {
		!self.is_visible() || self.prefers_reduced_motion() || self.animations_disabled()
	}
}

/// Plain-data environment for hosts that already know their values.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticEnvironment {
	/// Reported surface size.
	pub size: Bounds,
	/// Reported reduced-motion preference.
	pub reduced_motion: bool,
	/// Reported page visibility.
	pub visible: bool,
	/// Reported global switch.
	pub disabled: bool,
}

impl StaticEnvironment {
	/// Visible, motion-friendly environment of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			size: Bounds::new(width, height),
			reduced_motion: false,
			visible: true,
			disabled: false,
		}
	}
}

impl Environment for StaticEnvironment {
	fn surface_size(&self) -> Bounds {
		self.size
	}

	fn prefers_reduced_motion(&self) -> bool {
		self.reduced_motion
	}

	fn is_visible(&self) -> bool {
		self.visible
	}

	fn animations_disabled(&self) -> bool {
		self.disabled
	}
}
