//! Work order services
//!
//! - create: validate, resolve location, attach tenant, insert as open
//! - update: precondition, transition check, patch, status history
//! - details: work order plus child records and totals
//! - list: the tenant's work orders

mod create;
mod details;
mod list;
mod params;
pub mod set_attributes;
mod update;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mx_backend::Backend;
use mx_contracts::work_orders::StatusTransitionContract;
use mx_core::config::AppConfig;
use mx_core::error::MxError;
use mx_core::result::MxResult;
use mx_core::traits::Id;
use mx_models::{WorkOrder, WorkOrderPriority, WorkOrderStatus};

pub use create::CreateWorkOrderService;
pub use details::{LoadDetailsService, WorkOrderDetails};
pub use list::{FetchedWorkOrders, ListWorkOrdersService};
pub use params::{LocationRef, WorkOrderChanges, WorkOrderForm};
pub use update::UpdateWorkOrderService;

/// All work order operations over one backend
pub struct WorkOrderServices<B: Backend> {
    backend: Arc<B>,
    default_priority: WorkOrderPriority,
    transitions: StatusTransitionContract,
}

impl<B: Backend> Clone for WorkOrderServices<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            default_priority: self.default_priority,
            transitions: self.transitions,
        }
    }
}

impl<B: Backend> WorkOrderServices<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            default_priority: WorkOrderPriority::default(),
            transitions: StatusTransitionContract::enforcing(),
        }
    }

    /// Services configured from the workflow and page settings
    pub fn from_config(backend: Arc<B>, config: &AppConfig) -> MxResult<Self> {
        let default_priority = config
            .page
            .default_priority
            .parse()
            .map_err(MxError::Config)?;
        Ok(Self {
            backend,
            default_priority,
            transitions: StatusTransitionContract::new(config.workflow.enforce_transitions),
        })
    }

    pub fn with_default_priority(mut self, priority: WorkOrderPriority) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn with_transitions(mut self, transitions: StatusTransitionContract) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub async fn list(&self) -> MxResult<FetchedWorkOrders> {
        ListWorkOrdersService::new(self.backend.clone()).call().await
    }

    pub async fn create(&self, form: WorkOrderForm) -> MxResult<WorkOrder> {
        CreateWorkOrderService::new(self.backend.clone(), self.default_priority)
            .call(form)
            .await
    }

    pub async fn update(
        &self,
        id: Id,
        changes: WorkOrderChanges,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> MxResult<WorkOrder> {
        UpdateWorkOrderService::new(self.backend.clone(), self.transitions)
            .call(id, changes, expected_updated_at, None)
            .await
    }

    pub async fn transition(
        &self,
        id: Id,
        to: WorkOrderStatus,
        note: Option<String>,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> MxResult<WorkOrder> {
        UpdateWorkOrderService::new(self.backend.clone(), self.transitions)
            .transition(id, to, note, expected_updated_at)
            .await
    }

    pub async fn details(&self, id: Id) -> MxResult<WorkOrderDetails> {
        LoadDetailsService::new(self.backend.clone()).call(id).await
    }
}
