mod error;

pub use error::{ExportError, ValidationError};

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
