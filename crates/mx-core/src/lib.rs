//! # mx-core
//!
//! Core types, traits, and utilities for Maintenance RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Entity, Identifiable, Timestamped, TenantScoped)
//! - Configuration types

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::*;
pub use result::*;
pub use traits::*;
