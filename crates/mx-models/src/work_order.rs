//! Work order model
//!
//! Table: work_orders
//!
//! Work orders are the central entity: a unit of maintenance work tracked
//! through the status workflow in [`crate::status`].

use chrono::{DateTime, NaiveDate, Utc};
use mx_core::traits::{Entity, Id, Identifiable, TenantScoped, Timestamped};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activity::{PartUsed, TimeLog};
use crate::priority::{WorkOrderCategory, WorkOrderPriority};
use crate::status::WorkOrderStatus;

/// Reference to an assignee. The work order does not own the user record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssigneeRef {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AssigneeRef {
    pub fn new(id: Id) -> Self {
        Self { id, name: None }
    }

    pub fn named(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Name if known, else the identifier
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// Work order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkOrder {
    pub id: Id,

    /// Owning tenant (isolation key)
    pub tenant_id: Id,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<WorkOrderCategory>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub status: WorkOrderStatus,

    #[serde(default)]
    pub priority: Option<WorkOrderPriority>,

    #[serde(default)]
    pub assigned_to: Vec<AssigneeRef>,

    #[serde(default)]
    pub asset_id: Option<Id>,

    #[serde(default)]
    pub location_id: Option<Id>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkOrder {
    /// New open work order with no optional attributes set
    pub fn new(tenant_id: Id, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            title: title.into(),
            description: None,
            category: None,
            tags: vec![],
            status: WorkOrderStatus::Open,
            priority: None,
            assigned_to: vec![],
            asset_id: None,
            location_id: None,
            due_date: None,
            start_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the given user is among the assignees
    pub fn is_assigned_to(&self, user_id: Id) -> bool {
        self.assigned_to.iter().any(|a| a.id == user_id)
    }

    pub fn is_unassigned(&self) -> bool {
        self.assigned_to.is_empty()
    }

    /// Past due and still active on the given day
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_active() && self.due_date.map(|due| due < today).unwrap_or(false)
    }
}

impl Identifiable for WorkOrder {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for WorkOrder {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        Some(self.updated_at)
    }
}

impl TenantScoped for WorkOrder {
    fn tenant_id(&self) -> Id {
        self.tenant_id
    }
}

impl Entity for WorkOrder {
    const TABLE_NAME: &'static str = "work_orders";
    const TYPE_NAME: &'static str = "Work order";
}

/// Denormalized totals aggregated from child records owned by other tables
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct WorkOrderTotals {
    pub time_spent_minutes: i64,
    pub labor_cost: f64,
    pub parts_cost: f64,
    pub total_cost: f64,
    pub parts_used: i64,
}

impl WorkOrderTotals {
    pub fn from_records(time_logs: &[TimeLog], parts: &[PartUsed]) -> Self {
        let time_spent_minutes = time_logs.iter().map(|log| log.minutes).sum();
        let labor_cost = time_logs.iter().map(TimeLog::cost).sum::<f64>();
        let parts_cost = parts.iter().map(PartUsed::cost).sum::<f64>();
        let parts_used = parts.iter().map(|p| p.quantity).sum();

        Self {
            time_spent_minutes,
            labor_cost,
            parts_cost,
            total_cost: labor_cost + parts_cost,
            parts_used,
        }
    }

    /// Time spent formatted as `"<h>h <m>m"`
    pub fn time_spent_label(&self) -> String {
        format!(
            "{}h {}m",
            self.time_spent_minutes / 60,
            self.time_spent_minutes % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> serde_json::Value {
        serde_json::json!({
            "id": Uuid::new_v4(),
            "tenant_id": Uuid::new_v4(),
            "title": "Fix conveyor",
            "status": "in_progress",
            "priority": "high",
            "category": "repair",
            "tags": ["line-2"],
            "assigned_to": [{ "id": Uuid::new_v4(), "name": "Dana" }],
            "due_date": "2026-11-02",
            "created_at": "2026-10-01T08:00:00Z",
            "updated_at": "2026-10-02T08:00:00Z"
        })
    }

    #[test]
    fn test_deserialize_backend_row() {
        let wo: WorkOrder = serde_json::from_value(sample_row()).unwrap();
        assert_eq!(wo.title, "Fix conveyor");
        assert_eq!(wo.status, WorkOrderStatus::InProgress);
        assert_eq!(wo.priority, Some(WorkOrderPriority::High));
        assert_eq!(wo.category, Some(WorkOrderCategory::Repair));
        assert_eq!(wo.assigned_to[0].display_name(), "Dana");
        assert!(wo.location_id.is_none());
    }

    #[test]
    fn test_missing_optional_columns() {
        let mut row = sample_row();
        let obj = row.as_object_mut().unwrap();
        obj.remove("priority");
        obj.remove("tags");
        obj.remove("assigned_to");

        let wo: WorkOrder = serde_json::from_value(row).unwrap();
        assert!(wo.priority.is_none());
        assert!(wo.tags.is_empty());
        assert!(wo.is_unassigned());
    }

    #[test]
    fn test_overdue() {
        let wo: WorkOrder = serde_json::from_value(sample_row()).unwrap();
        let before = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2026, 11, 3).unwrap();
        assert!(!wo.is_overdue(before));
        assert!(wo.is_overdue(after));

        let mut done = wo.clone();
        done.status = WorkOrderStatus::Completed;
        assert!(!done.is_overdue(after));
    }

    #[test]
    fn test_totals() {
        let work_order_id = Uuid::new_v4();
        let logs = vec![
            TimeLog::new(work_order_id, Uuid::new_v4(), 90, Some(40.0)),
            TimeLog::new(work_order_id, Uuid::new_v4(), 30, None),
        ];
        let parts = vec![
            PartUsed::new(work_order_id, "Belt", 2, 12.5),
            PartUsed::new(work_order_id, "Bearing", 1, 5.0),
        ];

        let totals = WorkOrderTotals::from_records(&logs, &parts);
        assert_eq!(totals.time_spent_minutes, 120);
        assert_eq!(totals.labor_cost, 60.0);
        assert_eq!(totals.parts_cost, 30.0);
        assert_eq!(totals.total_cost, 90.0);
        assert_eq!(totals.parts_used, 3);
        assert_eq!(totals.time_spent_label(), "2h 0m");
    }
}
