//! # mx-contracts
//!
//! Contract validation for Maintenance RS.
//!
//! Contracts validate work order payloads before any backend call and decide
//! which status transitions are legal.

pub mod base;
pub mod work_orders;

pub use base::*;
