//! Runtime tunables for the drawing surface.
//!
//! Defaults come from [`crate::consts`]. A host may override any subset by
//! passing a JSON object to [`SketchConfig::from_json`]; fields that are
//! absent keep their defaults and out-of-range values are replaced by them.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{BACKGROUND_COLOR, CULL_MARGIN_WORLD, ZOOM_SENSITIVITY};
use crate::error::HostError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Scale change per wheel pixel.
    pub zoom_sensitivity: f64,
    /// World units added around the visible rectangle before culling.
    pub cull_margin: f64,
    /// Surface background; also the eraser paint color.
    pub background_color: String,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            zoom_sensitivity: ZOOM_SENSITIVITY,
            cull_margin: CULL_MARGIN_WORLD,
            background_color: BACKGROUND_COLOR.to_owned(),
        }
    }
}

impl SketchConfig {
    /// Parse a (possibly partial) JSON override.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Config`] if `json` is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        let parsed: Self = serde_json::from_str(json)?;
        Ok(parsed.sanitized())
    }

    /// Replace unusable values with their defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            zoom_sensitivity: if self.zoom_sensitivity.is_finite() && self.zoom_sensitivity > 0.0 {
                self.zoom_sensitivity
            } else {
                defaults.zoom_sensitivity
            },
            cull_margin: if self.cull_margin.is_finite() && self.cull_margin >= 0.0 {
                self.cull_margin
            } else {
                defaults.cull_margin
            },
            background_color: if self.background_color.trim().is_empty() {
                defaults.background_color
            } else {
                self.background_color
            },
        }
    }
}
