//! # mx-models
//!
//! Domain models for Maintenance RS.
//!
//! Every model maps to one backend table and round-trips through serde using
//! the backend's snake_case column names and enum literals.

pub use mx_core::traits::{Entity, Id, Identifiable, TenantScoped, Timestamped};

pub mod activity;
pub mod location;
pub mod priority;
pub mod status;
pub mod status_change;
pub mod user;
pub mod work_order;

pub use activity::{PartUsed, TimeLog, WorkOrderComment};
pub use location::{Asset, Location};
pub use priority::{WorkOrderCategory, WorkOrderPriority};
pub use status::WorkOrderStatus;
pub use status_change::StatusChange;
pub use user::CurrentUser;
pub use work_order::{AssigneeRef, WorkOrder, WorkOrderTotals};
