//! Errors surfaced by the browser host bridge.
//!
//! The drawing core never fails: missing resources are skipped silently.
//! Only mounting onto the DOM and parsing host configuration can error.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_error_message(&value))
    }
}

/// Best-effort string form of a thrown JS value.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
