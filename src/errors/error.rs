use serde::Serialize;
use thiserror::Error;

/// Field-level validation errors, raised before an export pipeline runs.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required {
        field: String,
    },

    #[error("Field '{field}' must be at least {min} characters")]
    MinLength {
        field: String,
        min: usize,
    },

    #[error("Field '{field}' must be between {min} and {max}")]
    Range {
        field: String,
        min: String,
        max: String,
    },

    #[error("Field '{field}' contains invalid format: {reason}")]
    Format {
        field: String,
        reason: String,
    },

    #[error("Field '{field}' contains an invalid value: {reason}")]
    InvalidValue {
        field: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        Self::Required {
            field: field.to_string(),
        }
    }

    pub fn min_length(field: &str, min: usize) -> Self {
        Self::MinLength {
            field: field.to_string(),
            min,
        }
    }

    pub fn range(field: &str, min: &str, max: &str) -> Self {
        Self::Range {
            field: field.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn format(field: &str, reason: &str) -> Self {
        Self::Format {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised by the export pipeline.
///
/// Every variant is produced before any partial payload escapes a
/// renderer; rendering is all-or-nothing per call and nothing is retried
/// internally.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format '{requested}'. Valid formats: {}", .supported.join(", "))]
    UnsupportedFormat {
        requested: String,
        supported: Vec<String>,
    },

    #[error("No template registered for category '{0}'")]
    MissingTemplate(String),

    #[error("Rendering capability '{0}' is not available")]
    MissingCapability(&'static str),

    #[error("Export format '{0}' is already registered")]
    DuplicateFormat(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_lists_valid_formats() {
        let err = ExportError::UnsupportedFormat {
            requested: "bogus".to_string(),
            supported: vec!["csv".to_string(), "json".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("bogus"));
        assert!(message.contains("csv, json"));
    }

    #[test]
    fn validation_error_converts_to_export_error() {
        let err: ExportError = ValidationError::required("limit").into();
        assert!(matches!(err, ExportError::Validation(_)));
    }
}
