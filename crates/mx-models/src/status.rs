//! Work order status workflow
//!
//! Table column: work_orders.status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a work order
///
/// Legal successors:
///
/// | From        | To                         |
/// |-------------|----------------------------|
/// | draft       | open                       |
/// | open        | in_progress, on_hold       |
/// | in_progress | completed, on_hold         |
/// | on_hold     | in_progress, cancelled     |
/// | completed   | archived                   |
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Draft,
    #[default]
    Open,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
    Archived,
}

impl WorkOrderStatus {
    pub const ALL: [WorkOrderStatus; 7] = [
        Self::Draft,
        Self::Open,
        Self::InProgress,
        Self::OnHold,
        Self::Completed,
        Self::Cancelled,
        Self::Archived,
    ];

    /// Wire literal
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Archived => "archived",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Open => "Open",
            Self::InProgress => "In progress",
            Self::OnHold => "On hold",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Archived => "Archived",
        }
    }

    /// Statuses reachable in one step
    pub fn allowed_transitions(&self) -> &'static [WorkOrderStatus] {
        match self {
            Self::Draft => &[Self::Open],
            Self::Open => &[Self::InProgress, Self::OnHold],
            Self::InProgress => &[Self::Completed, Self::OnHold],
            Self::OnHold => &[Self::InProgress, Self::Cancelled],
            Self::Completed => &[Self::Archived],
            Self::Cancelled | Self::Archived => &[],
        }
    }

    pub fn can_transition_to(&self, to: WorkOrderStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Archived)
    }

    /// Whether work is still expected on the order
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress | Self::OnHold)
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown work order status {:?}", s))
    }
}
