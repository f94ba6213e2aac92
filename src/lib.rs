//! portfolio-fx: canvas particle effects for a personal portfolio site.
//!
//! This crate provides a WASM particle engine and Leptos component that
//! render an ambient starfield background, a sparkle trail and twinkling
//! icon overlays, pausing for hidden tabs and reduced-motion users.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Only needed for its `js` feature, which gives `rand` entropy on wasm.
use getrandom as _;

pub mod components;

pub use components::particle_fx::{EffectCanvas, EffectsConfig, FrameRateMonitor, Preset, watch_frame_rate};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("portfolio-fx: logging initialized");
}

/// Load effect settings from a script element with id="fx-config".
/// Missing or malformed settings fall back to the defaults.
pub fn load_effects_config() -> EffectsConfig {
	let Some(json_text) = read_config_script() else {
		return EffectsConfig::default();
	};
	match EffectsConfig::from_json(&json_text) {
		Ok(config) => {
			info!("portfolio-fx: loaded effect settings");
			config
		}
		Err(e) => {
			warn!("portfolio-fx: ignoring effect settings: {}", e);
			EffectsConfig::default()
		}
	}
}

fn read_config_script() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("fx-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Mounts the three effects and the global animation switch.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_effects_config();
	let (disabled, set_disabled) = signal(false);

	// Latches the switch off if the page cannot keep up.
	let watch = SendWrapper::new(watch_frame_rate(FrameRateMonitor::default(), move || {
		set_disabled.set(true)
	}));
	on_cleanup(move || drop(watch));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<EffectCanvas
			preset=Preset::Starfield
			config=config.clone()
			disabled=disabled
			fullscreen=true
		/>
		<header class="hero" style="position: relative;">
			<EffectCanvas preset=Preset::SparkleTrail config=config.clone() disabled=disabled />
			<h1>"Pranjal Lokhande"</h1>
			<p class="subtitle">"Software engineer"</p>
		</header>
		<section class="about-card" style="position: relative;">
			<EffectCanvas preset=Preset::IconTwinkle config=config disabled=disabled />
			<h2>"About"</h2>
		</section>
		<button
			class="motion-toggle"
			aria-pressed=move || disabled.get().to_string()
			on:click=move |_| set_disabled.update(|d| *d = !*d)
		>
			{move || if disabled.get() { "Enable animations" } else { "Disable animations" }}
		</button>
	}
}
