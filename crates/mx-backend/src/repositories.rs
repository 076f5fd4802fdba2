//! Typed repositories over the generic backend
//!
//! Each repository decodes rows of one table family into models. Errors
//! stay [`BackendError`]s; services convert them at their boundary.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mx_core::traits::Id;
use mx_models::{Location, PartUsed, StatusChange, TimeLog, WorkOrder, WorkOrderComment};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::Backend;
use crate::error::{BackendError, BackendResult};
use crate::table::{Row, RowFilter, Table, TenantScope};

/// Decode one row
pub fn decode<T: DeserializeOwned>(table: Table, row: Row) -> BackendResult<T> {
    serde_json::from_value(Value::Object(row)).map_err(|e| BackendError::decode(table, e))
}

/// Decode a list of rows
pub fn decode_all<T: DeserializeOwned>(table: Table, rows: Vec<Row>) -> BackendResult<Vec<T>> {
    rows.into_iter().map(|row| decode(table, row)).collect()
}

/// Encode a value as a row; non-object values are rejected
pub fn encode<T: Serialize>(table: Table, value: &T) -> BackendResult<Row> {
    match serde_json::to_value(value).map_err(|e| BackendError::decode(table, e))? {
        Value::Object(row) => Ok(row),
        other => Err(BackendError::Rejected(format!(
            "expected an object for {}, got {}",
            table, other
        ))),
    }
}

/// Work order repository
pub struct WorkOrderRepository<B: Backend> {
    backend: Arc<B>,
}

impl<B: Backend> WorkOrderRepository<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn list_for_tenant(&self, tenant_id: Id) -> BackendResult<Vec<WorkOrder>> {
        let rows = self
            .backend
            .list(Table::WorkOrders, TenantScope::Tenant(tenant_id), None)
            .await?;
        decode_all(Table::WorkOrders, rows)
    }

    pub async fn find(&self, id: Id) -> BackendResult<Option<WorkOrder>> {
        match self.backend.get(Table::WorkOrders, id).await? {
            Some(row) => decode(Table::WorkOrders, row).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`find`](Self::find), but absence is an error
    pub async fn fetch(&self, id: Id) -> BackendResult<WorkOrder> {
        self.find(id).await?.ok_or(BackendError::NotFound {
            table: Table::WorkOrders,
            id,
        })
    }

    pub async fn insert(&self, row: Row) -> BackendResult<WorkOrder> {
        let stored = self.backend.insert(Table::WorkOrders, row).await?;
        decode(Table::WorkOrders, stored)
    }

    /// Patch a work order; with `expected_updated_at` the write only
    /// applies while the stored row still carries that timestamp
    pub async fn update(
        &self,
        id: Id,
        patch: Row,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> BackendResult<WorkOrder> {
        let precondition = expected_updated_at
            .map(|expected| RowFilter::eq("updated_at", expected.to_rfc3339()));
        let stored = self
            .backend
            .update(Table::WorkOrders, id, patch, precondition)
            .await?;
        decode(Table::WorkOrders, stored)
    }
}

/// Location repository
pub struct LocationRepository<B: Backend> {
    backend: Arc<B>,
}

impl<B: Backend> LocationRepository<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn list_for_tenant(&self, tenant_id: Id) -> BackendResult<Vec<Location>> {
        let rows = self
            .backend
            .list(Table::Locations, TenantScope::Tenant(tenant_id), None)
            .await?;
        decode_all(Table::Locations, rows)
    }

    pub async fn find(&self, id: Id) -> BackendResult<Option<Location>> {
        match self.backend.get(Table::Locations, id).await? {
            Some(row) => decode(Table::Locations, row).map(Some),
            None => Ok(None),
        }
    }

    /// Location whose name matches a form label (trimmed, case-insensitive)
    pub async fn find_by_label(&self, tenant_id: Id, label: &str) -> BackendResult<Option<Location>> {
        Ok(self
            .list_for_tenant(tenant_id)
            .await?
            .into_iter()
            .find(|location| location.matches_label(label)))
    }
}

/// Child records of a work order: time logs, parts, comments, status history
pub struct ActivityRepository<B: Backend> {
    backend: Arc<B>,
}

impl<B: Backend> ActivityRepository<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    async fn children<T: DeserializeOwned>(&self, table: Table, work_order_id: Id) -> BackendResult<Vec<T>> {
        let rows = self
            .backend
            .list(
                table,
                TenantScope::Inherited,
                Some(RowFilter::eq("work_order_id", work_order_id.to_string())),
            )
            .await?;
        decode_all(table, rows)
    }

    pub async fn time_logs(&self, work_order_id: Id) -> BackendResult<Vec<TimeLog>> {
        self.children(Table::TimeLogs, work_order_id).await
    }

    pub async fn parts_used(&self, work_order_id: Id) -> BackendResult<Vec<PartUsed>> {
        self.children(Table::WorkOrderPartsUsed, work_order_id).await
    }

    pub async fn comments(&self, work_order_id: Id) -> BackendResult<Vec<WorkOrderComment>> {
        self.children(Table::WorkOrderComments, work_order_id).await
    }

    /// Status history, oldest first
    pub async fn status_history(&self, work_order_id: Id) -> BackendResult<Vec<StatusChange>> {
        let mut history: Vec<StatusChange> = self
            .children(Table::WorkOrderStatusHistory, work_order_id)
            .await?;
        history.sort_by_key(|change| change.changed_at);
        Ok(history)
    }

    pub async fn record_status_change(&self, change: &StatusChange) -> BackendResult<StatusChange> {
        let row = encode(Table::WorkOrderStatusHistory, change)?;
        let stored = self.backend.insert(Table::WorkOrderStatusHistory, row).await?;
        decode(Table::WorkOrderStatusHistory, stored)
    }
}
