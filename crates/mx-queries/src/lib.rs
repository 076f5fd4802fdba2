//! # mx-queries
//!
//! Local query layer over fetched work orders.
//!
//! Nothing here talks to the backend: the page fetches the tenant's work
//! orders once and every filter, sort and calendar view is computed from
//! that list.
//!
//! ## Structure
//!
//! - `filters` - Filter criteria and the predicate deciding visibility
//! - `sorts` - Sort keys and orders
//! - `calendar` - Grouping by due date
//!
//! ## Example
//!
//! ```
//! use mx_queries::filters::{Choice, FilterCriteria};
//! use mx_models::{WorkOrder, WorkOrderStatus};
//! use uuid::Uuid;
//!
//! let tenant = Uuid::new_v4();
//! let records = vec![
//!     WorkOrder::new(tenant, "Wrapper Maintenance"),
//!     WorkOrder::new(tenant, "Conveyor Repair"),
//! ];
//!
//! let criteria = FilterCriteria::default()
//!     .with_search("wrap")
//!     .with_status(Choice::Only(WorkOrderStatus::Open));
//!
//! let visible = criteria.apply(&records, None);
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].title, "Wrapper Maintenance");
//! ```

pub mod calendar;
pub mod filters;
pub mod sorts;

pub use calendar::{group_by_due_date, CalendarGroups};
pub use filters::{AssigneeScope, Choice, FilterCriteria};
pub use sorts::{SortCriterion, SortDirection, SortKey, SortOrder};
