//! Error types for surface acquisition and config loading.
//!
//! Neither is fatal: a surface error leaves the effect in its static
//! fallback and a config error falls back to the defaults.

use thiserror::Error;

/// Why a drawing surface could not be attached.
#[derive(Debug, Error)]
pub enum SurfaceError {
	/// Running outside a browser.
	#[error("no browser window")]
	NoWindow,
	/// `getContext("2d")` returned nothing.
	#[error("canvas has no 2d context")]
	NoContext,
	/// A DOM call threw.
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<wasm_bindgen::JsValue> for SurfaceError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		SurfaceError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// Why an effects config could not be read.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Malformed JSON or a field of the wrong shape.
	#[error("invalid config json: {0}")]
	Json(#[from] serde_json::Error),
	/// A colour string that is not CSS hex, `rgb()` or `rgba()`.
	#[error("invalid color {0:?}")]
	InvalidColor(String),
}
