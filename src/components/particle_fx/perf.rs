//! Frame-rate watchdog.
//!
//! The page shell feeds it one timestamp per display frame; once the
//! average rate has stayed below the floor for long enough it reports
//! [`Verdict::Struggling`] and the shell switches animations off. The
//! verdict latches: a recovering frame rate does not re-enable effects.

use std::collections::VecDeque;

/// Frames averaged per measurement.
const WINDOW: usize = 30;
/// Gaps longer than this mean the page was suspended, not slow.
const SUSPEND_GAP_MS: f64 = 1000.0;

/// What the monitor concluded from the frames seen so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
	/// Not enough samples yet.
	Warming,
	/// Rate at or above the floor, or below it for less than the hold time.
	Healthy,
	/// Rate held below the floor; latched.
	Struggling,
}

/// Sliding-window frame-rate monitor.
#[derive(Clone, Debug)]
pub struct FrameRateMonitor {
	min_fps: f64,
	hold_ms: f64,
	intervals: VecDeque<f64>,
	last: Option<f64>,
	below_since: Option<f64>,
	tripped: bool,
}

impl Default for FrameRateMonitor {
	fn default() -> Self {
		Self::new(24.0, 3000.0)
	}
}

impl FrameRateMonitor {
	/// Trips once the rate stays under `min_fps` for `hold_ms`.
	pub fn new(min_fps: f64, hold_ms: f64) -> Self {
		Self {
			min_fps,
			hold_ms,
			intervals: VecDeque::with_capacity(WINDOW),
			last: None,
			below_since: None,
			tripped: false,
		}
	}

	/// Average frames per second over the current window.
	pub fn fps(&self) -> Option<f64> {
		if self.intervals.is_empty() {
			return None;
		}
		let mean = self.intervals.iter().sum::<f64>() / self.intervals.len() as f64;
		(mean > 0.0).then(|| 1000.0 / mean)
	}

	/// Records a frame at `now` (ms) and returns the updated verdict.
	pub fn record(&mut self, now: f64) -> Verdict {
		if self.tripped {
			return Verdict::Struggling;
		}
		if let Some(last) = self.last {
			let interval = now - last;
			if interval > SUSPEND_GAP_MS || interval < 0.0 {
				self.intervals.clear();
				self.below_since = None;
			} else {
				if self.intervals.len() == WINDOW {
					self.intervals.pop_front();
				}
				self.intervals.push_back(interval);
			}
		}
		self.last = Some(now);

		if self.intervals.len() < WINDOW / 2 {
			return Verdict::Warming;
		}
		match self.fps() {
			Some(fps) if fps < self.min_fps => {
				let since = *self.below_since.get_or_insert(now);
				if now - since >= self.hold_ms {
					self.tripped = true;
					Verdict::Struggling
				} else {
					Verdict::Healthy
				}
			}
			_ => {
				self.below_since = None;
				Verdict::Healthy
			}
		}
	}
}
