//! Error type for device setup and configuration loading.
//!
//! The state machine itself never fails: every (state, event) pair has a
//! defined outcome. Errors only surface while a device is being created or
//! its configuration is being read.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TapError>;

#[derive(Debug, Error)]
pub enum TapError {
    /// The host could not provide a timer for the gesture window.
    #[error("failed to create tap timer: {0}")]
    TimerCreation(#[source] std::io::Error),

    #[error("invalid tap configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TapError {
    /// Whether the error happened before a device could exist at all.
    #[must_use]
    pub fn is_setup_failure(&self) -> bool {
        matches!(self, Self::TimerCreation(_) | Self::InvalidConfig(_))
    }
}
