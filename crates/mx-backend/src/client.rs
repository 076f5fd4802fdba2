//! Backend client interface

use std::sync::Arc;

use async_trait::async_trait;
use mx_core::traits::Id;
use mx_models::CurrentUser;

use crate::error::BackendResult;
use crate::table::{Row, RowFilter, Table, TenantScope};

/// Generic query/command interface of the hosted backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Rows of a table visible in the scope, optionally filtered
    async fn list(&self, table: Table, scope: TenantScope, filter: Option<RowFilter>) -> BackendResult<Vec<Row>>;

    /// A row by id; `None` when absent
    async fn get(&self, table: Table, id: Id) -> BackendResult<Option<Row>>;

    /// Insert a row and return it as stored
    async fn insert(&self, table: Table, row: Row) -> BackendResult<Row>;

    /// Merge `patch` into the row and return it as stored
    ///
    /// With a `precondition`, the write only applies if the stored row
    /// matches it at write time; otherwise `PreconditionFailed`.
    async fn update(
        &self,
        table: Table,
        id: Id,
        patch: Row,
        precondition: Option<RowFilter>,
    ) -> BackendResult<Row>;

    async fn delete(&self, table: Table, id: Id) -> BackendResult<()>;

    /// The signed-in user; `None` when unauthenticated
    async fn current_user(&self) -> BackendResult<Option<CurrentUser>>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn list(&self, table: Table, scope: TenantScope, filter: Option<RowFilter>) -> BackendResult<Vec<Row>> {
        (**self).list(table, scope, filter).await
    }

    async fn get(&self, table: Table, id: Id) -> BackendResult<Option<Row>> {
        (**self).get(table, id).await
    }

    async fn insert(&self, table: Table, row: Row) -> BackendResult<Row> {
        (**self).insert(table, row).await
    }

    async fn update(
        &self,
        table: Table,
        id: Id,
        patch: Row,
        precondition: Option<RowFilter>,
    ) -> BackendResult<Row> {
        (**self).update(table, id, patch, precondition).await
    }

    async fn delete(&self, table: Table, id: Id) -> BackendResult<()> {
        (**self).delete(table, id).await
    }

    async fn current_user(&self) -> BackendResult<Option<CurrentUser>> {
        (**self).current_user().await
    }
}
