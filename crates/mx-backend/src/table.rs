//! Tables, rows and row filters

use chrono::DateTime;
use mx_core::traits::Id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A backend row: column name to JSON value
pub type Row = Map<String, Value>;

/// Tables this client reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    WorkOrders,
    Locations,
    Assets,
    Users,
    Procedures,
    TimeLogs,
    WorkOrderPartsUsed,
    WorkOrderComments,
    WorkOrderStatusHistory,
    Tenants,
}

impl Table {
    pub const ALL: [Table; 10] = [
        Self::WorkOrders,
        Self::Locations,
        Self::Assets,
        Self::Users,
        Self::Procedures,
        Self::TimeLogs,
        Self::WorkOrderPartsUsed,
        Self::WorkOrderComments,
        Self::WorkOrderStatusHistory,
        Self::Tenants,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkOrders => "work_orders",
            Self::Locations => "locations",
            Self::Assets => "assets",
            Self::Users => "users",
            Self::Procedures => "procedures",
            Self::TimeLogs => "time_logs",
            Self::WorkOrderPartsUsed => "work_order_parts_used",
            Self::WorkOrderComments => "work_order_comments",
            Self::WorkOrderStatusHistory => "work_order_status_history",
            Self::Tenants => "tenants",
        }
    }

    /// Human-readable name of one row, for error messages
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::WorkOrders => "Work order",
            Self::Locations => "Location",
            Self::Assets => "Asset",
            Self::Users => "User",
            Self::Procedures => "Procedure",
            Self::TimeLogs => "Time log",
            Self::WorkOrderPartsUsed => "Part used",
            Self::WorkOrderComments => "Comment",
            Self::WorkOrderStatusHistory => "Status change",
            Self::Tenants => "Tenant",
        }
    }

    /// Columns the backend fills in on insert
    pub fn timestamp_columns(&self) -> &'static [&'static str] {
        match self {
            Self::WorkOrders | Self::Locations | Self::Assets | Self::Procedures => {
                &["created_at", "updated_at"]
            }
            Self::WorkOrderComments => &["created_at"],
            Self::TimeLogs => &["logged_at"],
            Self::WorkOrderStatusHistory => &["changed_at"],
            Self::Users | Self::WorkOrderPartsUsed | Self::Tenants => &[],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown table {:?}", s))
    }
}

/// Tenant restriction applied to a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Only rows whose `tenant_id` column equals the id
    Tenant(Id),
    /// Child tables without a tenant column; row-level security still applies
    Inherited,
}

/// Conjunction of column equality tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    conditions: Vec<(String, Value)>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on a single column
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().and_eq(column, value)
    }

    pub fn and_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Every condition holds; a missing column never matches
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions.iter().all(|(column, value)| {
            row.get(column)
                .map(|stored| values_equal(stored, value))
                .unwrap_or(false)
        })
    }
}

/// Column equality; timestamps compare as instants, not as text
fn values_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a.as_str(), b.as_str()) {
        (Some(a), Some(b)) => match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        },
        _ => false,
    }
}

/// Read a uuid column
pub fn row_id(row: &Row, column: &str) -> Option<Id> {
    row.get(column)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}
