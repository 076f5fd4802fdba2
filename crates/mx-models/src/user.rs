//! Acting user
//!
//! Table: users. Only the signed-in user is ever loaded by this client.

use mx_core::traits::{Entity, Id, Identifiable, TenantScoped};
use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the backend session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub id: Id,
    pub tenant_id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CurrentUser {
    pub fn new(id: Id, tenant_id: Id) -> Self {
        Self {
            id,
            tenant_id,
            name: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Identifiable for CurrentUser {
    fn id(&self) -> Id {
        self.id
    }
}

impl TenantScoped for CurrentUser {
    fn tenant_id(&self) -> Id {
        self.tenant_id
    }
}

impl Entity for CurrentUser {
    const TABLE_NAME: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}
