//! Core traits shared by the domain models

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Primary key type. Backend identifiers are opaque UUIDs.
pub type Id = Uuid;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Trait for entities with system-managed timestamps
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Trait for entities that belong to exactly one tenant
pub trait TenantScoped {
    fn tenant_id(&self) -> Id;

    fn belongs_to(&self, tenant_id: Id) -> bool {
        self.tenant_id() == tenant_id
    }
}

/// Base trait for all domain entities
pub trait Entity: Identifiable + Send + Sync {
    /// The backend table name
    const TABLE_NAME: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}
