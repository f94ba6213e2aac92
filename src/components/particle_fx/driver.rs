//! Animation driver: owns one effect, its surface and its frame loop.
//!
//! Lifecycle is an explicit state machine:
//!
//! ```text
//! Uninitialized --mount--> Running <--sync_environment--> Paused
//!        \                    |                             |
//!         `------------------ dispose ----------------------'--> Disposed
//! ```
//!
//! Exactly one frame request is in flight while running. Each frame runs one
//! simulation step and then one render, and only then asks for the next
//! frame. Dispose cancels the outstanding request before returning, so no
//! step can run against a torn-down surface.

use log::{debug, warn};

use super::effect::Effect;
use super::environment::Environment;
use super::error::SurfaceError;
use super::particle::Bounds;
use super::surface::Surface;

/// Tolerance for frame-rate throttling so a 30 fps cap on a 60 Hz display
/// steps on every second frame rather than every third.
const FRAME_SLACK_MS: f64 = 1.0;

/// Where a driver is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
	/// Built but not mounted, or mounted without a surface.
	Uninitialized,
	/// Stepping on every due frame.
	Running,
	/// Particles frozen, no frame requested.
	Paused,
	/// Torn down for good.
	Disposed,
}

/// Source of "call me on the next display frame" callbacks.
pub trait FrameScheduler {
	/// Token identifying one outstanding request.
	type Handle: Copy;
	/// Requests one callback; `None` if the host cannot schedule.
	fn request_frame(&mut self) -> Option<Self::Handle>;
	/// Withdraws a request that has not fired yet.
	fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Drives one [`Effect`] on one surface.
pub struct AnimationDriver<S: Surface, E: Environment, F: FrameScheduler> {
	state: DriverState,
	effect: Box<dyn Effect>,
	surface: Option<S>,
	env: E,
	scheduler: F,
	pending: Option<F::Handle>,
	populated: bool,
	last_step: Option<f64>,
	frames: u64,
	teardown: Vec<Box<dyn FnOnce()>>,
}

impl<S: Surface, E: Environment, F: FrameScheduler> AnimationDriver<S, E, F> {
	/// An unmounted driver; nothing happens until [`mount`](Self::mount).
	pub fn new(effect: Box<dyn Effect>, env: E, scheduler: F) -> Self {
		Self {
			state: DriverState::Uninitialized,
			effect,
			surface: None,
			env,
			scheduler,
			pending: None,
			populated: false,
			last_step: None,
			frames: 0,
			teardown: Vec::new(),
		}
	}

	/// Current lifecycle state.
	pub fn state(&self) -> DriverState {
		self.state
	}

	/// The effect being driven.
	pub fn effect(&self) -> &dyn Effect {
		self.effect.as_ref()
	}

	/// The attached surface; `None` before mount and after dispose.
	pub fn surface(&self) -> Option<&S> {
		self.surface.as_ref()
	}

	/// The environment consulted on every frame.
	pub fn environment(&self) -> &E {
		&self.env
	}

	/// Mutable access for hosts that push new signal values; follow up with
	/// [`sync_environment`](Self::sync_environment) or [`resize`](Self::resize).
	pub fn environment_mut(&mut self) -> &mut E {
		&mut self.env
	}

	/// The frame scheduler.
	pub fn scheduler(&self) -> &F {
		&self.scheduler
	}

	/// Number of step+render pairs executed so far.
	pub fn frames_rendered(&self) -> u64 {
		self.frames
	}

	/// Whether a frame request is outstanding.
	pub fn has_pending_frame(&self) -> bool {
		self.pending.is_some()
	}

	/// Attaches the surface and starts the loop.
	///
	/// An unavailable surface is not an error for the page: the driver logs
	/// it, schedules nothing and the effect simply never appears.
	pub fn mount(&mut self, surface: Result<S, SurfaceError>, now: f64) {
		if self.state != DriverState::Uninitialized {
			return;
		}
		let mut surface = match surface {
			Ok(surface) => surface,
			Err(e) => {
				warn!(
					"portfolio-fx: {} has no drawing surface ({e}), leaving it static",
					self.effect.name()
				);
				return;
			}
		};

		let bounds = self.env.surface_size();
		if !bounds.is_empty() {
			surface.resize(bounds);
		}
		self.surface = Some(surface);
		self.populate(bounds, now);
		self.state = DriverState::Running;
		debug!("portfolio-fx: {} mounted", self.effect.name());
		self.sync_environment();
	}

	/// Re-reads the environment and pauses or resumes accordingly.
	pub fn sync_environment(&mut self) {
		let blocked = self.motion_blocked();
		match self.state {
			DriverState::Running if blocked => {
				self.cancel_pending();
				self.state = DriverState::Paused;
				debug!("portfolio-fx: {} paused", self.effect.name());
			}
			DriverState::Running => {
				if self.pending.is_none() {
					self.schedule();
				}
			}
			DriverState::Paused if !blocked => {
				self.state = DriverState::Running;
				self.last_step = None;
				debug!("portfolio-fx: {} resumed", self.effect.name());
				self.schedule();
			}
			_ => {}
		}
	}

	/// Frame callback. Returns whether a step ran.
	pub fn on_frame(&mut self, now: f64) -> bool {
		self.pending = None;
		if self.state != DriverState::Running {
			return false;
		}
		if self.motion_blocked() {
			self.state = DriverState::Paused;
			debug!("portfolio-fx: {} paused", self.effect.name());
			return false;
		}

		let due = match (self.effect.motion().target_fps, self.last_step) {
			(Some(fps), Some(last)) if fps > 0.0 => now - last >= 1000.0 / fps - FRAME_SLACK_MS,
			_ => true,
		};
		let mut stepped = false;
		if due {
			if let Some(surface) = self.surface.as_mut() {
				self.effect.step(now);
				self.effect.render(surface);
				self.frames += 1;
				self.last_step = Some(now);
				stepped = true;
			}
		}
		self.schedule();
		stepped
	}

	/// Adopts the environment's current surface size.
	///
	/// Zero-sized bounds are ignored until a real size shows up, and a size
	/// the surface already has is a no-op.
	pub fn resize(&mut self, now: f64) {
		if !matches!(self.state, DriverState::Running | DriverState::Paused) {
			return;
		}
		let bounds = self.env.surface_size();
		if bounds.is_empty() {
			debug!(
				"portfolio-fx: {} ignoring empty resize {}x{}",
				self.effect.name(),
				bounds.width,
				bounds.height
			);
			return;
		}
		if self.populated && self.surface.as_ref().is_some_and(|s| s.bounds() == bounds) {
			return;
		}
		if let Some(surface) = self.surface.as_mut() {
			surface.resize(bounds);
		}
		if self.populated {
			self.effect.resize(bounds, now);
		} else {
			self.populate(bounds, now);
		}
	}

	/// Registers teardown to run exactly once when the driver is disposed.
	pub fn on_dispose(&mut self, hook: impl FnOnce() + 'static) {
		if self.state == DriverState::Disposed {
			hook();
		} else {
			self.teardown.push(Box::new(hook));
		}
	}

	/// Stops the loop for good and releases everything the driver holds.
	pub fn dispose(&mut self) {
		if self.state == DriverState::Disposed {
			return;
		}
		self.cancel_pending();
		self.state = DriverState::Disposed;
		for hook in self.teardown.drain(..) {
			hook();
		}
		self.effect.release();
		self.surface = None;
		debug!("portfolio-fx: {} disposed", self.effect.name());
	}

	fn motion_blocked(&self) -> bool {
		self.effect.motion().disabled || self.env.motion_blocked()
	}

	fn populate(&mut self, bounds: Bounds, now: f64) {
		if bounds.is_empty() {
			debug!(
				"portfolio-fx: {} waiting for a non-empty surface",
				self.effect.name()
			);
			return;
		}
		self.effect.populate(bounds, now);
		self.populated = true;
	}

	fn schedule(&mut self) {
		if self.pending.is_none() {
			self.pending = self.scheduler.request_frame();
		}
	}

	fn cancel_pending(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.scheduler.cancel_frame(handle);
		}
	}
}

impl<S: Surface, E: Environment, F: FrameScheduler> Drop for AnimationDriver<S, E, F> {
	fn drop(&mut self) {
		self.dispose();
	}
}
