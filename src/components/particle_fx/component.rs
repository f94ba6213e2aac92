//! Leptos component hosting one particle effect on a canvas.
//!
//! The component creates the canvas, builds the preset's effect and hands
//! both to an [`AnimationDriver`] backed by `requestAnimationFrame`. Size
//! changes (window resize for fullscreen canvases, a `ResizeObserver` on the
//! parent otherwise), tab visibility and the reduced-motion media query are
//! wired to the driver; unmounting the component disposes it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use super::browser::{BrowserEnvironment, CanvasSurface, Listeners, RafScheduler, SizeSource, now_ms};
use super::config::EffectsConfig;
use super::driver::AnimationDriver;
use super::effect::Preset;

type CanvasDriver = AnimationDriver<CanvasSurface, BrowserEnvironment, RafScheduler>;

const FULLSCREEN_STYLE: &str =
	"position: fixed; inset: 0; width: 100vw; height: 100vh; display: block; pointer-events: none; z-index: -1;";
const OVERLAY_STYLE: &str =
	"position: absolute; inset: 0; width: 100%; height: 100%; display: block; pointer-events: none;";

/// Renders a particle effect on a decorative canvas.
///
/// By default the canvas overlays its parent element and tracks that
/// element's size; set `fullscreen = true` to cover the viewport instead.
/// Flipping `disabled` pauses or resumes the effect without losing its
/// particles.
#[component]
pub fn EffectCanvas(
	/// Which effect to run.
	preset: Preset,
	/// Settings for all presets; only the one for `preset` is read.
	#[prop(optional)]
	config: EffectsConfig,
	/// Pauses the effect while true.
	#[prop(into, default = Signal::stored(false))]
	disabled: Signal<bool>,
	/// Cover the viewport instead of the parent element.
	#[prop(default = false)]
	fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<Rc<RefCell<CanvasDriver>>>>> = Rc::new(RefCell::new(None));
	let (mounted_init, mounted_sync) = (mounted.clone(), mounted.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			log::warn!("portfolio-fx: no window, {preset:?} stays static");
			return;
		};

		let size = match canvas.parent_element() {
			Some(parent) if !fullscreen => SizeSource::Element(parent),
			_ => SizeSource::Viewport,
		};
		let driver = start(&window, canvas, size, preset, &config, disabled);
		*mounted_init.borrow_mut() = Some(driver);
	});

	// The environment reads the signal untracked; this effect is what
	// notices a change and tells the driver.
	Effect::new(move |_| {
		disabled.track();
		if let Some(driver) = mounted_sync.borrow().as_ref() {
			driver.borrow_mut().sync_environment();
		}
	});

	let cleanup = SendWrapper::new(mounted);
	on_cleanup(move || {
		if let Some(driver) = cleanup.borrow_mut().take() {
			driver.borrow_mut().dispose();
		}
	});

	let style = if fullscreen { FULLSCREEN_STYLE } else { OVERLAY_STYLE };
	view! {
		<canvas node_ref=canvas_ref class="fx-canvas" aria-hidden="true" style=style />
	}
}

/// Builds the driver, wires its frame callback and DOM listeners, and
/// mounts it on `canvas`.
fn start(
	window: &Window,
	canvas: HtmlCanvasElement,
	size: SizeSource,
	preset: Preset,
	config: &EffectsConfig,
	disabled: Signal<bool>,
) -> Rc<RefCell<CanvasDriver>> {
	let env = BrowserEnvironment::new(window.clone(), size, disabled);
	let scheduler = RafScheduler::new(window.clone());
	let frame_slot = scheduler.callback_slot();
	let reduced_motion = env.reduced_motion_query().cloned();
	let measured = env.measured_element().cloned();
	let driver = Rc::new(RefCell::new(AnimationDriver::new(
		preset.build(config),
		env,
		scheduler,
	)));

	let driver_frame = Rc::downgrade(&driver);
	*frame_slot.borrow_mut() = Some(Closure::new(move |now: f64| {
		if let Some(driver) = driver_frame.upgrade() {
			driver.borrow_mut().on_frame(now);
		}
	}));

	let mut listeners = Listeners::default();
	let driver_resize = Rc::downgrade(&driver);
	let on_resize = move || {
		if let Some(driver) = driver_resize.upgrade() {
			driver.borrow_mut().resize(now_ms());
		}
	};
	match measured {
		Some(element) => listeners.observe_resize(&element, on_resize),
		None => listeners.listen(window, "resize", on_resize),
	}
	let sync = |driver: &Rc<RefCell<CanvasDriver>>| {
		let weak = Rc::downgrade(driver);
		move || {
			if let Some(driver) = weak.upgrade() {
				driver.borrow_mut().sync_environment();
			}
		}
	};
	if let Some(document) = window.document() {
		listeners.listen(&document, "visibilitychange", sync(&driver));
	}
	if let Some(query) = reduced_motion {
		listeners.listen(&query, "change", sync(&driver));
	}

	{
		let mut d = driver.borrow_mut();
		d.on_dispose(move || {
			listeners.detach();
			frame_slot.borrow_mut().take();
		});
		d.mount(CanvasSurface::new(canvas), now_ms());
	}
	driver
}
