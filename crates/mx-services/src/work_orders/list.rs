//! Work order list fetch

use std::sync::Arc;

use mx_backend::{Backend, WorkOrderRepository};
use mx_core::result::MxResult;
use mx_models::{CurrentUser, WorkOrder};
use tracing::{debug, instrument, warn};

use crate::session::require_user;

/// Work orders of the acting user's tenant, with that user
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedWorkOrders {
    pub current_user: CurrentUser,
    pub work_orders: Vec<WorkOrder>,
}

pub struct ListWorkOrdersService<B: Backend> {
    backend: Arc<B>,
}

impl<B: Backend> ListWorkOrdersService<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    #[instrument(skip(self))]
    pub async fn call(&self) -> MxResult<FetchedWorkOrders> {
        self.list().await.map_err(|e| {
            warn!(error = %e, code = e.error_code(), "Listing work orders failed");
            e
        })
    }

    async fn list(&self) -> MxResult<FetchedWorkOrders> {
        let current_user = require_user(self.backend.as_ref()).await?;
        let work_orders = WorkOrderRepository::new(self.backend.clone())
            .list_for_tenant(current_user.tenant_id)
            .await?;
        debug!(count = work_orders.len(), "Fetched work orders");

        Ok(FetchedWorkOrders {
            current_user,
            work_orders,
        })
    }
}
