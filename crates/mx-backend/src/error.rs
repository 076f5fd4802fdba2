//! Backend errors

use mx_core::error::MxError;
use mx_core::traits::Id;

use crate::table::Table;

/// Error type for backend operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Row not found in {table}: {id}")]
    NotFound { table: Table, id: Id },

    #[error("Row {id} in {table} no longer matches the update precondition")]
    PreconditionFailed { table: Table, id: Id },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Rejected by backend: {0}")]
    Rejected(String),

    #[error("Could not decode row from {table}: {message}")]
    Decode { table: Table, message: String },
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    pub fn decode(table: Table, err: serde_json::Error) -> Self {
        BackendError::Decode {
            table,
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for MxError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthenticated => MxError::Unauthorized {
                message: err.to_string(),
            },
            BackendError::NotFound { table, id } => MxError::not_found(table.entity_name(), id),
            BackendError::PreconditionFailed { .. } => MxError::Conflict {
                message: err.to_string(),
            },
            BackendError::Request(message) | BackendError::Rejected(message) => {
                MxError::Backend { message }
            }
            BackendError::Decode { .. } => MxError::Serialization(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_into_mx_error() {
        let err: MxError = BackendError::Unauthenticated.into();
        assert_eq!(err.error_code(), "unauthorized");

        let err: MxError = BackendError::NotFound {
            table: Table::WorkOrders,
            id: Uuid::nil(),
        }
        .into();
        assert!(matches!(err, MxError::NotFound { entity: "Work order", .. }));

        let err: MxError = BackendError::PreconditionFailed {
            table: Table::WorkOrders,
            id: Uuid::nil(),
        }
        .into();
        assert_eq!(err.error_code(), "conflict");
        assert!(!err.is_retryable());

        let err: MxError = BackendError::Request("connection reset".into()).into();
        assert!(err.is_retryable());
    }
}
