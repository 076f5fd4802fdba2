//! # mx-backend
//!
//! The hosted backend as seen by this client: a generic table interface
//! (`list`, `get`, `insert`, `update`, `delete`, `current_user`) over JSON
//! rows, plus typed repositories that decode those rows into models.
//!
//! [`MemoryBackend`] implements the interface in process. It backs the CLI
//! and every async test in the workspace.

pub mod client;
pub mod error;
pub mod memory;
pub mod repositories;
pub mod table;

pub use client::Backend;
pub use error::{BackendError, BackendResult};
pub use memory::{MemoryBackend, Operation, SeedDocument};
pub use repositories::{ActivityRepository, LocationRepository, WorkOrderRepository};
pub use table::{Row, RowFilter, Table, TenantScope};
