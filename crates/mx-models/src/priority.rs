//! Priority and category enumerations
//!
//! Table columns: work_orders.priority, work_orders.category

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Work order priority, ordered from least to most pressing
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl WorkOrderPriority {
    pub const ALL: [WorkOrderPriority; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for WorkOrderPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkOrderPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown priority {:?}", s))
    }
}

/// Kind of maintenance work
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderCategory {
    Maintenance,
    Repair,
    Inspection,
    Installation,
    Emergency,
}

impl WorkOrderCategory {
    pub const ALL: [WorkOrderCategory; 5] = [
        Self::Maintenance,
        Self::Repair,
        Self::Inspection,
        Self::Installation,
        Self::Emergency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintenance => "maintenance",
            Self::Repair => "repair",
            Self::Inspection => "inspection",
            Self::Installation => "installation",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for WorkOrderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkOrderCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category {:?}", s))
    }
}
