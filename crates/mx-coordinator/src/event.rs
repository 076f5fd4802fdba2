//! Events in, effects out

use chrono::{DateTime, Utc};
use mx_core::error::MxError;
use mx_core::traits::Id;
use mx_models::{WorkOrder, WorkOrderCategory, WorkOrderPriority, WorkOrderStatus};
use mx_queries::{AssigneeScope, Choice, SortOrder};
use mx_services::{FetchedWorkOrders, WorkOrderChanges, WorkOrderDetails, WorkOrderForm};

use crate::form::FormField;
use crate::view::ViewMode;

/// Staleness tag carried by every effect and echoed by its completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Page session the effect was issued in; advances on navigation
    pub session: u64,
    /// Advances on navigation and on every filter or sort change
    pub epoch: u64,
    /// Issue order within the coordinator, increasing
    pub seq: u64,
}

/// Async work requested by the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchWorkOrders {
        ticket: Ticket,
    },
    CreateWorkOrder {
        ticket: Ticket,
        form: WorkOrderForm,
    },
    UpdateWorkOrder {
        ticket: Ticket,
        id: Id,
        changes: WorkOrderChanges,
        expected_updated_at: Option<DateTime<Utc>>,
    },
    TransitionStatus {
        ticket: Ticket,
        id: Id,
        to: WorkOrderStatus,
        note: Option<String>,
        expected_updated_at: Option<DateTime<Utc>>,
    },
    LoadDetails {
        ticket: Ticket,
        id: Id,
    },
}

impl Effect {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::FetchWorkOrders { ticket }
            | Self::CreateWorkOrder { ticket, .. }
            | Self::UpdateWorkOrder { ticket, .. }
            | Self::TransitionStatus { ticket, .. }
            | Self::LoadDetails { ticket, .. } => *ticket,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchWorkOrders { .. } => "fetch_work_orders",
            Self::CreateWorkOrder { .. } => "create_work_order",
            Self::UpdateWorkOrder { .. } => "update_work_order",
            Self::TransitionStatus { .. } => "transition_status",
            Self::LoadDetails { .. } => "load_details",
        }
    }
}

/// Outcome of an effect
#[derive(Debug, Clone)]
pub enum Completion {
    Fetched(Result<FetchedWorkOrders, MxError>),
    Created(Result<WorkOrder, MxError>),
    Updated(Result<WorkOrder, MxError>),
    StatusChanged {
        id: Id,
        result: Result<WorkOrder, MxError>,
    },
    DetailsLoaded {
        id: Id,
        result: Result<WorkOrderDetails, MxError>,
    },
}

/// Everything the coordinator reacts to
#[derive(Debug, Clone)]
pub enum Event {
    /// Navigation onto the page
    PageEntered,
    /// Navigation away; in-flight results become stale
    PageLeft,
    Refresh,

    SearchChanged(String),
    StatusFilterChanged(Choice<WorkOrderStatus>),
    PriorityFilterChanged(Choice<WorkOrderPriority>),
    CategoryFilterChanged(Choice<WorkOrderCategory>),
    AssigneeFilterChanged(AssigneeScope),
    FiltersCleared,
    SortChanged(SortOrder),

    Select(Id),
    ViewModeChanged(ViewMode),
    CalendarMonthChanged { year: i32, month: u32 },

    NewWorkOrder,
    EditWorkOrder(Id),
    FormEdited(FormField),
    FormSubmitted,
    FormCancelled,

    StatusChangeRequested {
        id: Id,
        to: WorkOrderStatus,
        note: Option<String>,
    },
    NoticesDismissed,

    Completed {
        ticket: Ticket,
        completion: Completion,
    },
}
