//! Child records of a work order owned by other tables
//!
//! Tables: time_logs, work_order_parts_used, work_order_comments

use chrono::{DateTime, Utc};
use mx_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time logged against a work order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeLog {
    pub id: Id,
    pub work_order_id: Id,
    pub user_id: Id,
    pub minutes: i64,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl TimeLog {
    pub fn new(work_order_id: Id, user_id: Id, minutes: i64, hourly_rate: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            work_order_id,
            user_id,
            minutes,
            hourly_rate,
            note: None,
            logged_at: Utc::now(),
        }
    }

    /// Labour cost; unpriced logs cost nothing
    pub fn cost(&self) -> f64 {
        self.hourly_rate
            .map(|rate| self.minutes as f64 / 60.0 * rate)
            .unwrap_or(0.0)
    }
}

impl Identifiable for TimeLog {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for TimeLog {
    const TABLE_NAME: &'static str = "time_logs";
    const TYPE_NAME: &'static str = "Time log";
}

/// Inventory part consumed by a work order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartUsed {
    pub id: Id,
    pub work_order_id: Id,
    pub part_name: String,
    pub quantity: i64,
    pub unit_cost: f64,
}

impl PartUsed {
    pub fn new(work_order_id: Id, part_name: impl Into<String>, quantity: i64, unit_cost: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            work_order_id,
            part_name: part_name.into(),
            quantity,
            unit_cost,
        }
    }

    pub fn cost(&self) -> f64 {
        self.quantity as f64 * self.unit_cost
    }
}

impl Identifiable for PartUsed {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for PartUsed {
    const TABLE_NAME: &'static str = "work_order_parts_used";
    const TYPE_NAME: &'static str = "Part used";
}

/// Free-text comment on a work order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkOrderComment {
    pub id: Id,
    pub work_order_id: Id,
    pub author_id: Id,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for WorkOrderComment {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for WorkOrderComment {
    const TABLE_NAME: &'static str = "work_order_comments";
    const TYPE_NAME: &'static str = "Comment";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_log_cost() {
        let log = TimeLog::new(Uuid::new_v4(), Uuid::new_v4(), 45, Some(80.0));
        assert_eq!(log.cost(), 60.0);

        let unpriced = TimeLog::new(Uuid::new_v4(), Uuid::new_v4(), 45, None);
        assert_eq!(unpriced.cost(), 0.0);
    }

    #[test]
    fn test_part_cost() {
        let part = PartUsed::new(Uuid::new_v4(), "Filter", 4, 2.25);
        assert_eq!(part.cost(), 9.0);
    }
}
