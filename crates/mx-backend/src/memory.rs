//! In-memory backend
//!
//! Behaves like the hosted backend for the operations this client uses:
//! ids and timestamps are assigned on insert, rows are scoped to the
//! signed-in user's tenant, and the store can be seeded from a JSON
//! document. Failures can be injected per operation for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use mx_core::traits::Id;
use mx_models::CurrentUser;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::client::Backend;
use crate::error::{BackendError, BackendResult};
use crate::table::{row_id, Row, RowFilter, Table, TenantScope};

/// Backend operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Insert,
    Update,
    Delete,
    CurrentUser,
}

/// Seed document accepted by [`MemoryBackend::from_seed`]
///
/// ```json
/// {
///   "current_user": { "id": "...", "tenant_id": "..." },
///   "tables": { "work_orders": [ { ... } ], "locations": [ { ... } ] }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub current_user: Option<CurrentUser>,
    #[serde(default)]
    pub tables: HashMap<Table, Vec<Row>>,
}

/// In-memory backend for development and testing
pub struct MemoryBackend {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    user: RwLock<Option<CurrentUser>>,
    failures: RwLock<HashMap<Operation, Vec<BackendError>>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            user: RwLock::new(None),
            failures: RwLock::new(HashMap::new()),
        }
    }

    /// Backend with a signed-in user
    pub fn signed_in(user: CurrentUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
            ..Self::new()
        }
    }

    pub fn from_seed(seed: SeedDocument) -> Self {
        let mut tables = HashMap::new();
        for (table, rows) in seed.tables {
            let rows = rows
                .into_iter()
                .map(|row| with_defaults(table, row))
                .collect::<Vec<_>>();
            tables.insert(table, rows);
        }
        Self {
            tables: RwLock::new(tables),
            user: RwLock::new(seed.current_user),
            failures: RwLock::new(HashMap::new()),
        }
    }

    /// Parse a seed document
    pub fn from_json(json: &str) -> BackendResult<Self> {
        let seed: SeedDocument =
            serde_json::from_str(json).map_err(|e| BackendError::Rejected(format!("invalid seed document: {}", e)))?;
        Ok(Self::from_seed(seed))
    }

    pub async fn sign_in(&self, user: CurrentUser) {
        *self.user.write().await = Some(user);
    }

    pub async fn sign_out(&self) {
        *self.user.write().await = None;
    }

    /// Insert rows as-is apart from missing ids and timestamps
    pub async fn seed(&self, table: Table, rows: Vec<Row>) {
        let mut tables = self.tables.write().await;
        let stored = tables.entry(table).or_default();
        stored.extend(rows.into_iter().map(|row| with_defaults(table, row)));
    }

    /// Make the next call of `operation` fail with `error`
    ///
    /// Queued failures are consumed in order, one per call.
    pub async fn fail_next(&self, operation: Operation, error: BackendError) {
        self.failures
            .write()
            .await
            .entry(operation)
            .or_default()
            .push(error);
    }

    /// Snapshot of a table, ignoring tenant scoping
    pub async fn rows(&self, table: Table) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    async fn take_failure(&self, operation: Operation) -> BackendResult<()> {
        let mut failures = self.failures.write().await;
        match failures.get_mut(&operation) {
            Some(queue) if !queue.is_empty() => {
                let error = queue.remove(0);
                tracing::debug!(?operation, %error, "injected backend failure");
                Err(error)
            }
            _ => Ok(()),
        }
    }

    /// Tenant of the signed-in user, if any
    async fn session_tenant(&self) -> Option<Id> {
        self.user.read().await.as_ref().map(|u| u.tenant_id)
    }
}

/// Fill in the id and timestamp columns the backend owns
fn with_defaults(table: Table, mut row: Row) -> Row {
    if !row.contains_key("id") {
        row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    let now = Value::String(Utc::now().to_rfc3339());
    for column in table.timestamp_columns() {
        if !row.get(*column).map(|v| !v.is_null()).unwrap_or(false) {
            row.insert(column.to_string(), now.clone());
        }
    }
    row
}

/// Row-level security: rows carrying a tenant column are only visible to
/// that tenant
fn visible_to(row: &Row, tenant: Option<Id>) -> bool {
    match (row_id(row, "tenant_id"), tenant) {
        (Some(row_tenant), Some(tenant)) => row_tenant == tenant,
        (Some(_), None) => false,
        (None, _) => true,
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list(&self, table: Table, scope: TenantScope, filter: Option<RowFilter>) -> BackendResult<Vec<Row>> {
        self.take_failure(Operation::List).await?;
        let session_tenant = self.session_tenant().await;

        let tables = self.tables.read().await;
        let rows = tables.get(&table).map(Vec::as_slice).unwrap_or(&[]);
        Ok(rows
            .iter()
            .filter(|row| visible_to(row, session_tenant))
            .filter(|row| match scope {
                TenantScope::Tenant(tenant) => row_id(row, "tenant_id") == Some(tenant),
                TenantScope::Inherited => true,
            })
            .filter(|row| filter.as_ref().map(|f| f.matches(row)).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn get(&self, table: Table, id: Id) -> BackendResult<Option<Row>> {
        self.take_failure(Operation::Get).await?;
        let session_tenant = self.session_tenant().await;

        let tables = self.tables.read().await;
        Ok(tables.get(&table).and_then(|rows| {
            rows.iter()
                .find(|row| row_id(row, "id") == Some(id) && visible_to(row, session_tenant))
                .cloned()
        }))
    }

    async fn insert(&self, table: Table, row: Row) -> BackendResult<Row> {
        self.take_failure(Operation::Insert).await?;
        let session_tenant = self.session_tenant().await;
        if session_tenant.is_none() {
            return Err(BackendError::Unauthenticated);
        }
        if !visible_to(&row, session_tenant) {
            return Err(BackendError::Rejected(format!(
                "row violates row-level security policy for {}",
                table
            )));
        }

        let row = with_defaults(table, row);
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        if let Some(id) = row_id(&row, "id") {
            if rows.iter().any(|r| row_id(r, "id") == Some(id)) {
                return Err(BackendError::Rejected(format!("duplicate key {} in {}", id, table)));
            }
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        id: Id,
        patch: Row,
        precondition: Option<RowFilter>,
    ) -> BackendResult<Row> {
        self.take_failure(Operation::Update).await?;
        let session_tenant = self.session_tenant().await;
        if session_tenant.is_none() {
            return Err(BackendError::Unauthenticated);
        }

        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row_id(row, "id") == Some(id) && visible_to(row, session_tenant))
            })
            .ok_or(BackendError::NotFound { table, id })?;

        // Evaluated under the write lock
        if let Some(precondition) = precondition {
            if !precondition.matches(row) {
                return Err(BackendError::PreconditionFailed { table, id });
            }
        }

        for (column, value) in patch {
            // Identity and ownership columns are immutable
            if column == "id" || column == "tenant_id" {
                continue;
            }
            row.insert(column, value);
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: Table, id: Id) -> BackendResult<()> {
        self.take_failure(Operation::Delete).await?;
        let session_tenant = self.session_tenant().await;

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        let before = rows.len();
        rows.retain(|row| !(row_id(row, "id") == Some(id) && visible_to(row, session_tenant)));
        if rows.len() == before {
            return Err(BackendError::NotFound { table, id });
        }
        Ok(())
    }

    async fn current_user(&self) -> BackendResult<Option<CurrentUser>> {
        self.take_failure(Operation::CurrentUser).await?;
        Ok(self.user.read().await.clone())
    }
}
