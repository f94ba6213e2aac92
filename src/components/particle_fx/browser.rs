//! Browser backends: canvas surface, `requestAnimationFrame` scheduler and
//! the DOM-backed environment.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, EventTarget, HtmlCanvasElement, MediaQueryList,
	ResizeObserver, Window,
};

use super::driver::FrameScheduler;
use super::environment::Environment;
use super::error::SurfaceError;
use super::particle::Bounds;
use super::perf::{FrameRateMonitor, Verdict};
use super::surface::{Backdrop, SPARKLE_CURVES, SPARKLE_START, Surface};
use super::theme::Color;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Milliseconds on the same clock `requestAnimationFrame` reports.
pub fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or_else(js_sys::Date::now)
}

/// [`Surface`] backed by a 2D canvas context, scaled for the device pixel
/// ratio so drawing happens in CSS pixels.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	dpr: f64,
	bounds: Bounds,
}

impl CanvasSurface {
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
		let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(SurfaceError::NoContext)?
			.dyn_into()
			.map_err(|_| SurfaceError::NoContext)?;
		let dpr = window.device_pixel_ratio().max(1.0);
		Ok(Self {
			canvas,
			ctx,
			dpr,
			bounds: Bounds::default(),
		})
	}

	fn trace_sparkle(&self) {
		let ctx = &self.ctx;
		ctx.begin_path();
		ctx.move_to(SPARKLE_START.0, SPARKLE_START.1);
		for [c1, c2, to] in SPARKLE_CURVES {
			ctx.bezier_curve_to(c1.0, c1.1, c2.0, c2.1, to.0, to.1);
		}
		ctx.close_path();
	}
}

impl Surface for CanvasSurface {
	fn bounds(&self) -> Bounds {
		self.bounds
	}

	fn resize(&mut self, bounds: Bounds) {
		self.bounds = bounds;
		self.canvas.set_width((bounds.width * self.dpr).round() as u32);
		self.canvas.set_height((bounds.height * self.dpr).round() as u32);
		let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
	}

	fn clear(&mut self, backdrop: Backdrop) {
		let (w, h) = (self.bounds.width, self.bounds.height);
		match backdrop {
			Backdrop::Transparent => self.ctx.clear_rect(0.0, 0.0, w, h),
			Backdrop::Fill(color) => {
				self.ctx.save();
				self.ctx.set_global_alpha(1.0);
				self.ctx.set_fill_style_str(&color.to_css());
				self.ctx.fill_rect(0.0, 0.0, w, h);
				self.ctx.restore();
			}
		}
	}

	fn save(&mut self) {
		self.ctx.save();
	}

	fn restore(&mut self) {
		self.ctx.restore();
	}

	fn translate(&mut self, x: f64, y: f64) {
		let _ = self.ctx.translate(x, y);
	}

	fn rotate(&mut self, angle: f64) {
		let _ = self.ctx.rotate(angle);
	}

	fn scale(&mut self, sx: f64, sy: f64) {
		let _ = self.ctx.scale(sx, sy);
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
	}

	fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill();
	}

	fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color) {
		let Some((&(x0, y0), rest)) = points.split_first() else {
			return;
		};
		self.ctx.begin_path();
		self.ctx.move_to(x0, y0);
		for &(x, y) in rest {
			self.ctx.line_to(x, y);
		}
		self.ctx.close_path();
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill();
	}

	fn fill_sparkle(&mut self, color: Color) {
		self.trace_sparkle();
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill();
	}
}

/// `requestAnimationFrame` scheduler. The frame callback is installed after
/// the driver exists, since it has to capture the driver.
pub struct RafScheduler {
	window: Window,
	callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl RafScheduler {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			callback: Rc::new(RefCell::new(None)),
		}
	}

	/// Shared slot holding the frame callback; emptying it breaks the
	/// driver/closure reference cycle.
	pub fn callback_slot(&self) -> Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> {
		self.callback.clone()
	}
}

impl FrameScheduler for RafScheduler {
	type Handle = i32;

	fn request_frame(&mut self) -> Option<i32> {
		let slot = self.callback.borrow();
		let cb = slot.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel_frame(&mut self, handle: i32) {
		let _ = self.window.cancel_animation_frame(handle);
	}
}

/// What the surface is measured against.
#[derive(Clone)]
pub enum SizeSource {
	/// The browser viewport.
	Viewport,
	/// An element's client box, usually the canvas's parent.
	Element(Element),
}

/// [`Environment`] that reads the live DOM on every query.
pub struct BrowserEnvironment {
	window: Window,
	size: SizeSource,
	reduced_motion: Option<MediaQueryList>,
	disabled: Signal<bool>,
}

impl BrowserEnvironment {
	pub fn new(window: Window, size: SizeSource, disabled: Signal<bool>) -> Self {
		let reduced_motion = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
		Self {
			window,
			size,
			reduced_motion,
			disabled,
		}
	}

	pub fn reduced_motion_query(&self) -> Option<&MediaQueryList> {
		self.reduced_motion.as_ref()
	}

	/// The element whose box sets the surface size, if not the viewport.
	pub fn measured_element(&self) -> Option<&Element> {
		match &self.size {
			SizeSource::Element(el) => Some(el),
			SizeSource::Viewport => None,
		}
	}
}

impl Environment for BrowserEnvironment {
	fn surface_size(&self) -> Bounds {
		match &self.size {
			SizeSource::Viewport => {
				let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
				Bounds::new(read(self.window.inner_width()), read(self.window.inner_height()))
			}
			SizeSource::Element(el) => Bounds::new(el.client_width() as f64, el.client_height() as f64),
		}
	}

	fn prefers_reduced_motion(&self) -> bool {
		self.reduced_motion.as_ref().is_some_and(MediaQueryList::matches)
	}

	fn is_visible(&self) -> bool {
		self.window.document().is_none_or(|d| !d.hidden())
	}

	fn animations_disabled(&self) -> bool {
		self.disabled.get_untracked()
	}
}

/// DOM listeners and observers registered for one effect;
/// [`detach`](Self::detach) removes them all.
#[derive(Default)]
pub struct Listeners {
	events: Vec<(EventTarget, &'static str, Closure<dyn FnMut()>)>,
	observers: Vec<(ResizeObserver, Closure<dyn FnMut()>)>,
}

impl Listeners {
	/// Adds an event listener; logs and skips it if the browser refuses.
	pub fn listen(&mut self, target: &EventTarget, event: &'static str, handler: impl FnMut() + 'static) {
		let cb = Closure::<dyn FnMut()>::new(handler);
		match target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
			Ok(()) => self.events.push((target.clone(), event, cb)),
			Err(e) => log::warn!("portfolio-fx: could not listen for {event}: {e:?}"),
		}
	}

	/// Calls `handler` whenever `element`'s box changes size, including
	/// once right after observation starts.
	pub fn observe_resize(&mut self, element: &Element, handler: impl FnMut() + 'static) {
		let cb = Closure::<dyn FnMut()>::new(handler);
		match ResizeObserver::new(cb.as_ref().unchecked_ref()) {
			Ok(observer) => {
				observer.observe(element);
				self.observers.push((observer, cb));
			}
			Err(e) => log::warn!("portfolio-fx: could not observe element size: {e:?}"),
		}
	}

	pub fn detach(&mut self) {
		for (target, event, cb) in self.events.drain(..) {
			let _ = target.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
		for (observer, _cb) in self.observers.drain(..) {
			observer.disconnect();
		}
	}
}

/// Handle to a running frame-rate watchdog loop; cancels it when dropped.
pub struct FrameRateWatch {
	window: Window,
	handle: Rc<RefCell<Option<i32>>>,
	callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl Drop for FrameRateWatch {
	fn drop(&mut self) {
		if let Some(handle) = self.handle.borrow_mut().take() {
			let _ = self.window.cancel_animation_frame(handle);
		}
		self.callback.borrow_mut().take();
	}
}

/// Runs a [`FrameRateMonitor`] on its own animation-frame loop and calls
/// `on_struggle` once when it trips. Returns `None` outside a browser.
pub fn watch_frame_rate(
	mut monitor: FrameRateMonitor,
	on_struggle: impl FnOnce() + 'static,
) -> Option<FrameRateWatch> {
	let window = web_sys::window()?;
	let handle: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
	let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

	let (handle_inner, callback_inner, window_inner) = (handle.clone(), callback.clone(), window.clone());
	let mut on_struggle = Some(on_struggle);
	*callback.borrow_mut() = Some(Closure::new(move |now: f64| {
		handle_inner.borrow_mut().take();
		if monitor.record(now) == Verdict::Struggling {
			log::warn!(
				"portfolio-fx: sustained {:.0} fps, disabling animations",
				monitor.fps().unwrap_or(0.0)
			);
			if let Some(cb) = on_struggle.take() {
				cb();
			}
			return;
		}
		if let Some(ref cb) = *callback_inner.borrow() {
			*handle_inner.borrow_mut() = window_inner
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.ok();
		}
	}));

	if let Some(ref cb) = *callback.borrow() {
		*handle.borrow_mut() = window.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
	}

	Some(FrameRateWatch {
		window,
		handle,
		callback,
	})
}
