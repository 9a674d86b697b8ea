//! # Error Types
//!
//! Structured error types for calc_core. Numeric edge cases never produce an
//! error (bad numbers coerce to zero, degenerate ratios split to zero); the
//! variants here cover the things that genuinely cannot proceed: unknown
//! layers, fields that don't apply to a layer kind, files, and rendering.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn parse_tier(name: &str) -> CalcResult<&'static str> {
//!     match name {
//!         "economy" => Ok("Economy"),
//!         other => Err(CalcError::invalid_input("tier", other, "Unknown tier")),
//!     }
//! }
//!
//! assert!(parse_tier("deluxe").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation and export operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (unknown field name, wrong layer kind, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// No layer with the given id exists in the store
    #[error("Layer not found: {id}")]
    LayerNotFound { id: String },

    /// No color with the given id exists on the layer
    #[error("Color not found: {color_id} on layer {layer_id}")]
    ColorNotFound { layer_id: String, color_id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// The report document could not be rendered
    #[error("Report rendering failed: {reason}")]
    RenderFailed { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a LayerNotFound error
    pub fn layer_not_found(id: impl ToString) -> Self {
        CalcError::LayerNotFound { id: id.to_string() }
    }

    /// Create a ColorNotFound error
    pub fn color_not_found(layer_id: impl ToString, color_id: impl ToString) -> Self {
        CalcError::ColorNotFound {
            layer_id: layer_id.to_string(),
            color_id: color_id.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl ToString) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(reason: impl Into<String>) -> Self {
        CalcError::RenderFailed {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::LayerNotFound { .. } => "LAYER_NOT_FOUND",
            CalcError::ColorNotFound { .. } => "COLOR_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::RenderFailed { .. } => "RENDER_FAILED",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("quartz", "varnish", "Quartz only applies to resin layers");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));

        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::layer_not_found("abc").error_code(), "LAYER_NOT_FOUND");
        assert_eq!(CalcError::color_not_found("a", "b").error_code(), "COLOR_NOT_FOUND");
        assert_eq!(CalcError::render_failed("boom").error_code(), "RENDER_FAILED");
    }

    #[test]
    fn test_error_display() {
        let error = CalcError::file_error("read", "plan.json", "not found");
        assert_eq!(error.to_string(), "File error: read on 'plan.json' - not found");
    }
}
