//! Status history (audit) model
//!
//! Table: work_order_status_history
//!
//! Transition notes live here, never on the work order itself.

use chrono::{DateTime, Utc};
use mx_core::traits::{Entity, Id, Identifiable, TenantScoped};
use serde::{Deserialize, Serialize};

use crate::status::WorkOrderStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub id: Id,
    pub work_order_id: Id,
    pub tenant_id: Id,
    pub from_status: WorkOrderStatus,
    pub to_status: WorkOrderStatus,
    #[serde(default)]
    pub note: Option<String>,
    pub changed_by: Id,
    pub changed_at: DateTime<Utc>,
}

impl Identifiable for StatusChange {
    fn id(&self) -> Id {
        self.id
    }
}

impl TenantScoped for StatusChange {
    fn tenant_id(&self) -> Id {
        self.tenant_id
    }
}

impl Entity for StatusChange {
    const TABLE_NAME: &'static str = "work_order_status_history";
    const TYPE_NAME: &'static str = "Status change";
}
