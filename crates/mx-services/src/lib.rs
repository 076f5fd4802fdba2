//! # mx-services
//!
//! Mutation orchestration for work orders.
//!
//! Every service follows the same shape: validate the payload with its
//! contract, read the acting user from the backend session, resolve
//! references (location labels), then write. Validation failures never
//! reach the backend write; backend failures are logged here and returned
//! as [`MxError`](mx_core::MxError) values.

pub mod locations;
pub mod session;
pub mod work_orders;

pub use locations::LocationResolver;
pub use work_orders::{
    FetchedWorkOrders, LocationRef, WorkOrderChanges, WorkOrderDetails, WorkOrderForm,
    WorkOrderServices,
};
