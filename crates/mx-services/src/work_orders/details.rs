//! Detail view loading

use std::sync::Arc;

use mx_backend::{ActivityRepository, Backend, LocationRepository, WorkOrderRepository};
use mx_core::result::MxResult;
use mx_core::traits::Id;
use mx_models::{
    Location, PartUsed, StatusChange, TimeLog, WorkOrder, WorkOrderComment, WorkOrderTotals,
};
use tracing::{instrument, warn};

use crate::session::require_user;

/// A work order with the records shown on its detail view
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrderDetails {
    pub work_order: WorkOrder,
    pub location: Option<Location>,
    pub time_logs: Vec<TimeLog>,
    pub parts_used: Vec<PartUsed>,
    pub comments: Vec<WorkOrderComment>,
    pub status_history: Vec<StatusChange>,
    pub totals: WorkOrderTotals,
}

pub struct LoadDetailsService<B: Backend> {
    backend: Arc<B>,
}

impl<B: Backend> LoadDetailsService<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    #[instrument(skip(self))]
    pub async fn call(&self, id: Id) -> MxResult<WorkOrderDetails> {
        self.load(id).await.map_err(|e| {
            warn!(error = %e, code = e.error_code(), "Loading work order details failed");
            e
        })
    }

    async fn load(&self, id: Id) -> MxResult<WorkOrderDetails> {
        require_user(self.backend.as_ref()).await?;
        let work_order = WorkOrderRepository::new(self.backend.clone()).fetch(id).await?;

        let location = match work_order.location_id {
            Some(location_id) => LocationRepository::new(self.backend.clone())
                .find(location_id)
                .await?,
            None => None,
        };

        let activity = ActivityRepository::new(self.backend.clone());
        let (time_logs, parts_used, comments, status_history) = tokio::try_join!(
            activity.time_logs(id),
            activity.parts_used(id),
            activity.comments(id),
            activity.status_history(id),
        )?;
        let totals = WorkOrderTotals::from_records(&time_logs, &parts_used);

        Ok(WorkOrderDetails {
            work_order,
            location,
            time_logs,
            parts_used,
            comments,
            status_history,
            totals,
        })
    }
}
