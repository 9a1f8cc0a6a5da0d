//! Error types for the overlay.
//!
//! Only configuration can fail. Everything at runtime degrades to
//! "fewer visuals" instead of returning an error.

use std::fmt;

/// Errors produced while loading or validating an [`OverlayConfig`](crate::OverlayConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON override could not be parsed.
    Parse(serde_json::Error),
    /// A `min..max` range is inverted or not finite.
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    /// A scalar is outside its allowed domain.
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Failed to parse overlay config: {}", e),
            ConfigError::InvalidRange { field, min, max } => {
                write!(f, "Invalid range for `{}`: {}..{}", field, min, max)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
