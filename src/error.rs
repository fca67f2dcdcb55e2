//! # Error Types
//!
//! This module defines the error taxonomy for barcode rendering.
//!
//! | Kind | Raised when | Geometry produced? |
//! |------|-------------|--------------------|
//! | [`ErrorKind::Construction`] | No encoder could be built for the value/format pair | No |
//! | [`ErrorKind::Validation`] | The encoder rejects the value under its own rules | No |
//! | [`ErrorKind::Legibility`] | Fitting the bars into the viewport shrinks them below half size | Yes |
//! | [`ErrorKind::Host`] | Options, I/O or server failures around the core | - |
//!
//! The compiler and the fit policy never fail; every variant here originates
//! in the layers around them.

use thiserror::Error;

/// Main error type for barpath operations
#[derive(Debug, Error)]
pub enum BarcodeError {
    /// The encoder could not be constructed for this format/value combination.
    #[error("Invalid barcode format.")]
    Construction { format: String, reason: String },

    /// The encoder was constructed but reports the value invalid.
    #[error("Invalid barcode for selected format.")]
    Validation { format: String, reason: String },

    /// Geometry exists but would be rendered below the legibility threshold.
    #[error("value_too_long")]
    Legibility { scale: f64 },

    /// A geometry or style option is out of range or malformed.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Options file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Server setup or transport failure
    #[error("Server error: {0}")]
    Server(String),

    /// Output encoding failure (PNG)
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`BarcodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Construction,
    Validation,
    Legibility,
    Host,
}

impl BarcodeError {
    pub fn construction(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Construction {
            format: format.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            format: format.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Construction { .. } => ErrorKind::Construction,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Legibility { .. } => ErrorKind::Legibility,
            _ => ErrorKind::Host,
        }
    }

    /// Longer description including the underlying reason, for logs and HTTP bodies.
    pub fn detail(&self) -> String {
        match self {
            Self::Construction { format, reason } | Self::Validation { format, reason } => {
                format!("{} ({}: {})", self, format, reason)
            }
            Self::Legibility { scale } => format!("{} (scale {:.3})", self, scale),
            other => other.to_string(),
        }
    }
}
