//! Tunable constants for the viewport, erase detection and default pen.
//!
//! Everything here deserializes from JSON with missing fields falling back to
//! the defaults, so a host can ship a partial settings blob.

use crate::stroke::PenStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default prerender oversampling factor.
pub const DEFAULT_RENDER_SCALE: f64 = 5.0;

/// Default zoom change per wheel tick.
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What happens when a zoom-out step would drop below the fit zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomFloor {
    /// Clamp zoom to the fit zoom and keep the cursor anchor.
    #[default]
    Clamp,
    /// Leave zoom and pan alone and ask the host to reset to fit.
    ResetToFit,
}

/// Viewport zoom settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Oversampling factor the page raster was rendered at.
    pub render_scale: f64,
    /// Zoom change per discrete input event.
    pub zoom_step: f64,
    /// Upper zoom bound (1.0 shows the prerendered raster 1:1).
    pub max_zoom: f64,
    /// Behavior at the lower zoom bound.
    pub floor: ZoomFloor,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            render_scale: DEFAULT_RENDER_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            max_zoom: 1.0,
            floor: ZoomFloor::default(),
        }
    }
}

impl ViewportConfig {
    /// Zoom at which the prerendered page shows at its natural size.
    pub fn fit_zoom(&self) -> f64 {
        1.0 / self.render_scale
    }

    /// Reject settings that would let zoom reach zero or go non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.render_scale.is_finite() || self.render_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "render_scale must be positive, got {}",
                self.render_scale
            )));
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be positive, got {}",
                self.zoom_step
            )));
        }
        if !self.max_zoom.is_finite() || self.max_zoom < self.fit_zoom() {
            return Err(ConfigError::Invalid(format!(
                "max_zoom {} is below fit zoom {}",
                self.max_zoom,
                self.fit_zoom()
            )));
        }
        Ok(())
    }
}

/// Scratch-out detection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraseConfig {
    /// Minimum samples before a stroke can count as a scratch.
    pub min_points: usize,
    /// Minimum sharp turns for a scratch.
    pub min_reversals: usize,
    /// Displacements below this (normalized units) are ignored.
    pub noise_threshold: f64,
}

impl Default for EraseConfig {
    fn default() -> Self {
        Self {
            min_points: 15,
            min_reversals: 4,
            noise_threshold: 0.005,
        }
    }
}

impl EraseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.noise_threshold.is_finite() || self.noise_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "noise_threshold must be non-negative, got {}",
                self.noise_threshold
            )));
        }
        Ok(())
    }
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkConfig {
    pub viewport: ViewportConfig,
    pub erase: EraseConfig,
    pub pen: PenStyle,
}

impl InkConfig {
    /// Parse and validate settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize settings to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;
        self.erase.validate()?;
        if !self.pen.width.is_finite() || self.pen.width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pen width must be positive, got {}",
                self.pen.width
            )));
        }
        Ok(())
    }
}
