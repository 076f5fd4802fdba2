//! Location and asset models
//!
//! Tables: locations, assets

use mx_core::traits::{Entity, Id, Identifiable, TenantScoped};
use serde::{Deserialize, Serialize};

/// A site, building or area where work happens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: Id,
    pub tenant_id: Id,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl Location {
    /// Case-insensitive comparison against a form label
    pub fn matches_label(&self, label: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(label.trim())
    }
}

impl Identifiable for Location {
    fn id(&self) -> Id {
        self.id
    }
}

impl TenantScoped for Location {
    fn tenant_id(&self) -> Id {
        self.tenant_id
    }
}

impl Entity for Location {
    const TABLE_NAME: &'static str = "locations";
    const TYPE_NAME: &'static str = "Location";
}

/// A maintained piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: Id,
    pub tenant_id: Id,
    pub name: String,
    #[serde(default)]
    pub location_id: Option<Id>,
}

impl Identifiable for Asset {
    fn id(&self) -> Id {
        self.id
    }
}

impl TenantScoped for Asset {
    fn tenant_id(&self) -> Id {
        self.tenant_id
    }
}

impl Entity for Asset {
    const TABLE_NAME: &'static str = "assets";
    const TYPE_NAME: &'static str = "Asset";
}
