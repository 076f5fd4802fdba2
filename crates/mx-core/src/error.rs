//! Core error types for Maintenance RS
//!
//! Covers the three failure families the coordinator distinguishes:
//! validation (caught before any network call), backend failures, and
//! missing records.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Core error type for all maintenance operations
#[derive(Error, Debug, Clone)]
pub enum MxError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MxError {
    pub fn not_found(entity: &'static str, value: impl ToString) -> Self {
        MxError::NotFound {
            entity,
            field: "id",
            value: value.to_string(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        MxError::Backend {
            message: message.into(),
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            MxError::NotFound { .. } => "not_found",
            MxError::Unauthorized { .. } => "unauthorized",
            MxError::Validation(_) => "validation_failed",
            MxError::InvalidTransition { .. } => "invalid_transition",
            MxError::Conflict { .. } => "conflict",
            MxError::Backend { .. } => "backend_error",
            MxError::Serialization(_) => "serialization_error",
            MxError::Config(_) => "configuration_error",
        }
    }

    /// Text shown to the user in a transient notice
    pub fn user_message(&self) -> String {
        match self {
            MxError::Validation(errors) => errors.full_messages().join(", "),
            MxError::Conflict { .. } => {
                "This work order was changed by someone else. Reload and try again.".to_string()
            }
            MxError::InvalidTransition { from, to } => {
                format!("A work order cannot move from {} to {}", from, to)
            }
            MxError::Unauthorized { .. } => "You are not signed in".to_string(),
            MxError::NotFound { entity, .. } => format!("{} no longer exists", entity),
            other => other.to_string(),
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, MxError::Backend { .. })
    }
}

impl From<serde_json::Error> for MxError {
    fn from(err: serde_json::Error) -> Self {
        MxError::Serialization(err.to_string())
    }
}

/// Validation errors collection
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                errors.add(field, message);
            }
        }
        errors
    }
}

/// Contract violation reported against one attribute
#[derive(Error, Debug, Clone)]
pub enum ContractError {
    #[error("Attribute {attribute} is not writable")]
    AttributeNotWritable { attribute: String },
}

impl From<ContractError> for ValidationErrors {
    fn from(err: ContractError) -> Self {
        let mut errors = ValidationErrors::new();
        match err {
            ContractError::AttributeNotWritable { attribute } => {
                errors.add(attribute, "is not writable");
            }
        }
        errors
    }
}
