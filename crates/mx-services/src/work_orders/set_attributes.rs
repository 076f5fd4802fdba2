//! Payload to backend columns

use chrono::{DateTime, Duration, Utc};
use mx_backend::Row;
use mx_core::result::MxResult;
use mx_core::traits::Id;
use mx_models::{WorkOrderPriority, WorkOrderStatus};
use serde::Serialize;

use super::params::{WorkOrderChanges, WorkOrderForm};

fn put<T: Serialize>(row: &mut Row, column: &str, value: T) -> MxResult<()> {
    row.insert(column.to_string(), serde_json::to_value(value)?);
    Ok(())
}

fn normalize_text(text: Option<&String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Trimmed tags without blanks or duplicates, first occurrence wins
pub fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !seen.iter().any(|s: &String| s == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

/// Timestamp for an update, strictly after the stored one
pub fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Columns of a new work order; created work orders always start open
pub fn create_row(
    form: &WorkOrderForm,
    tenant_id: Id,
    location_id: Option<Id>,
    default_priority: WorkOrderPriority,
) -> MxResult<Row> {
    let mut row = Row::new();
    put(&mut row, "tenant_id", tenant_id)?;
    put(&mut row, "title", form.title.trim())?;
    put(&mut row, "description", normalize_text(form.description.as_ref()))?;
    put(&mut row, "category", form.category)?;
    put(&mut row, "tags", dedup_tags(&form.tags))?;
    put(&mut row, "status", WorkOrderStatus::Open)?;
    put(&mut row, "priority", form.priority.unwrap_or(default_priority))?;
    put(&mut row, "assigned_to", &form.assigned_to)?;
    put(&mut row, "asset_id", form.asset_id)?;
    put(&mut row, "location_id", location_id)?;
    put(&mut row, "due_date", form.due_date)?;
    put(&mut row, "start_date", form.start_date)?;
    Ok(row)
}

/// Columns to patch for an update
///
/// `location_id` is the resolved location when the changes touch it. The
/// tenant is never part of a patch.
pub fn update_patch(
    changes: &WorkOrderChanges,
    location_id: Option<Option<Id>>,
    updated_at: DateTime<Utc>,
) -> MxResult<Row> {
    let mut row = Row::new();
    if let Some(title) = &changes.title {
        put(&mut row, "title", title.trim())?;
    }
    if let Some(description) = &changes.description {
        put(&mut row, "description", normalize_text(description.as_ref()))?;
    }
    if let Some(category) = changes.category {
        put(&mut row, "category", category)?;
    }
    if let Some(tags) = &changes.tags {
        put(&mut row, "tags", dedup_tags(tags))?;
    }
    if let Some(status) = changes.status {
        put(&mut row, "status", status)?;
    }
    if let Some(priority) = changes.priority {
        put(&mut row, "priority", priority)?;
    }
    if let Some(assigned_to) = &changes.assigned_to {
        put(&mut row, "assigned_to", assigned_to)?;
    }
    if let Some(asset_id) = changes.asset_id {
        put(&mut row, "asset_id", asset_id)?;
    }
    if let Some(location_id) = location_id {
        put(&mut row, "location_id", location_id)?;
    }
    if let Some(due_date) = changes.due_date {
        put(&mut row, "due_date", due_date)?;
    }
    if let Some(start_date) = changes.start_date {
        put(&mut row, "start_date", start_date)?;
    }
    put(&mut row, "updated_at", updated_at)?;
    Ok(row)
}
