//! Result type aliases

use crate::error::{MxError, ValidationErrors};

/// Standard Result type for maintenance operations
pub type MxResult<T> = Result<T, MxError>;

/// Result of a contract or form validation
pub type ValidationResult = Result<(), ValidationErrors>;
