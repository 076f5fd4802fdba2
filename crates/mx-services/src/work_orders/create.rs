//! Create service for work orders

use std::sync::Arc;

use mx_backend::{Backend, WorkOrderRepository};
use mx_contracts::work_orders::CreateWorkOrderContract;
use mx_contracts::Contract;
use mx_core::result::MxResult;
use mx_models::{WorkOrder, WorkOrderPriority};
use tracing::{info, instrument, warn};

use super::params::WorkOrderForm;
use super::set_attributes;
use crate::locations::LocationResolver;
use crate::session::require_user;

/// Service for creating work orders
pub struct CreateWorkOrderService<B: Backend> {
    backend: Arc<B>,
    default_priority: WorkOrderPriority,
}

impl<B: Backend> CreateWorkOrderService<B> {
    pub fn new(backend: Arc<B>, default_priority: WorkOrderPriority) -> Self {
        Self {
            backend,
            default_priority,
        }
    }

    /// Execute the create operation
    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn call(&self, form: WorkOrderForm) -> MxResult<WorkOrder> {
        match self.create(form).await {
            Ok(work_order) => {
                info!(id = %work_order.id, "Work order created");
                Ok(work_order)
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Work order create failed");
                Err(e)
            }
        }
    }

    async fn create(&self, form: WorkOrderForm) -> MxResult<WorkOrder> {
        CreateWorkOrderContract::new().validate(&form)?;

        let user = require_user(self.backend.as_ref()).await?;
        let location_id = LocationResolver::new(self.backend.clone())
            .resolve(user.tenant_id, form.location.as_ref())
            .await?;

        let row = set_attributes::create_row(&form, user.tenant_id, location_id, self.default_priority)?;
        let work_order = WorkOrderRepository::new(self.backend.clone()).insert(row).await?;
        Ok(work_order)
    }
}
