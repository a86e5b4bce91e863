#![forbid(unsafe_code)]

//! Tap recognition settings, fixed when a device is initialized.
//!
//! # Loading
//!
//! With the `config` feature, settings can come from TOML or JSON. Missing
//! fields take their defaults.
//!
//! ```toml
//! enabled = true
//! timeout_ms = 180
//! motion_threshold = 30.0
//! ```
//!
//! ```rust,ignore
//! let config = TapConfig::from_toml_file("tap.toml")?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TapError};

/// Gesture window in milliseconds.
pub const DEFAULT_TAP_TIMEOUT_MS: u64 = 180;

/// Motion allowed before a touch stops being a tap, in touchpad motion units.
pub const DEFAULT_TAP_MOVE_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TapConfig {
    /// Whether tapping is recognized at all (default: true).
    pub enabled: bool,
    /// Gesture window for tap/hold and double-tap/drag decisions (default: 180ms).
    pub timeout_ms: u64,
    /// Distance a finger may travel and still tap (default: 30).
    pub motion_threshold: f64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: DEFAULT_TAP_TIMEOUT_MS,
            motion_threshold: DEFAULT_TAP_MOVE_THRESHOLD,
        }
    }
}

impl TapConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Check every field. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.timeout_ms == 0 {
            errors.push("timeout_ms must be greater than 0".to_string());
        }
        if !self.motion_threshold.is_finite() || self.motion_threshold <= 0.0 {
            errors.push(format!(
                "motion_threshold must be a positive number, got {}",
                self.motion_threshold
            ));
        }
        errors
    }

    /// [`validate`](Self::validate), folded into a single error.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(TapError::InvalidConfig(errors.join("; ")))
        }
    }

    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}
