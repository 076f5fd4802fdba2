//! Work order contracts

mod base;
mod create;
mod transition;
mod update;

pub use base::{WorkOrderBaseContract, WorkOrderData};
pub use create::CreateWorkOrderContract;
pub use transition::{StatusTransitionContract, TransitionCheck};
pub use update::UpdateWorkOrderContract;

/// Attribute names as they appear in validation errors and change tracking
pub mod attributes {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const TAGS: &str = "tags";
    pub const STATUS: &str = "status";
    pub const PRIORITY: &str = "priority";
    pub const ASSIGNED_TO: &str = "assigned_to";
    pub const ASSET: &str = "asset_id";
    pub const LOCATION: &str = "location";
    pub const DUE_DATE: &str = "due_date";
    pub const START_DATE: &str = "start_date";
    pub const TENANT: &str = "tenant_id";
}
