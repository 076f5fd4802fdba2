//! Update and status transition services for work orders

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mx_backend::{ActivityRepository, Backend, WorkOrderRepository};
use mx_contracts::work_orders::{StatusTransitionContract, TransitionCheck, UpdateWorkOrderContract};
use mx_contracts::Contract;
use mx_core::error::MxError;
use mx_core::result::MxResult;
use mx_core::traits::Id;
use mx_models::{StatusChange, WorkOrder, WorkOrderStatus};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::params::WorkOrderChanges;
use super::set_attributes;
use crate::locations::LocationResolver;
use crate::session::require_user;

/// Service for updating work orders
///
/// Status changes go through the transition table and leave a row in the
/// status history. With `expected_updated_at` set, the update only applies
/// if nobody else wrote the work order since it was read; the backend checks
/// it again at write time.
pub struct UpdateWorkOrderService<B: Backend> {
    backend: Arc<B>,
    transitions: StatusTransitionContract,
}

impl<B: Backend> UpdateWorkOrderService<B> {
    pub fn new(backend: Arc<B>, transitions: StatusTransitionContract) -> Self {
        Self {
            backend,
            transitions,
        }
    }

    /// Execute the update operation
    #[instrument(skip(self, changes, note))]
    pub async fn call(
        &self,
        id: Id,
        changes: WorkOrderChanges,
        expected_updated_at: Option<DateTime<Utc>>,
        note: Option<String>,
    ) -> MxResult<WorkOrder> {
        match self.update(id, changes, expected_updated_at, note).await {
            Ok(work_order) => {
                info!(status = %work_order.status, "Work order updated");
                Ok(work_order)
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Work order update failed");
                Err(e)
            }
        }
    }

    /// Move a work order to another status, keeping an optional note in
    /// the history
    pub async fn transition(
        &self,
        id: Id,
        to: WorkOrderStatus,
        note: Option<String>,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> MxResult<WorkOrder> {
        self.call(id, WorkOrderChanges::new().with_status(to), expected_updated_at, note)
            .await
    }

    async fn update(
        &self,
        id: Id,
        mut changes: WorkOrderChanges,
        expected_updated_at: Option<DateTime<Utc>>,
        note: Option<String>,
    ) -> MxResult<WorkOrder> {
        let user = require_user(self.backend.as_ref()).await?;
        let work_orders = WorkOrderRepository::new(self.backend.clone());
        let current = work_orders.fetch(id).await?;

        if let Some(expected) = expected_updated_at {
            if expected != current.updated_at {
                return Err(MxError::Conflict {
                    message: format!(
                        "work order {} was updated at {}, expected {}",
                        id, current.updated_at, expected
                    ),
                });
            }
        }

        let mut contract = UpdateWorkOrderContract::new(&user, &current);
        for attribute in changes.changed_attributes() {
            contract.mark_changed(attribute);
        }
        contract.validate(&changes)?;

        let check = match changes.status {
            Some(to) => self.transitions.check(current.status, to)?,
            None => TransitionCheck::Unchanged,
        };
        if check == TransitionCheck::Unchanged {
            changes.status = None;
        }
        if check == TransitionCheck::Forced {
            debug!(from = %current.status, to = ?changes.status, "Transition outside workflow allowed");
        }
        if changes.is_empty() {
            debug!("Nothing to write");
            return Ok(current);
        }

        let location_id = match &changes.location {
            None => None,
            Some(location) => Some(
                LocationResolver::new(self.backend.clone())
                    .resolve(user.tenant_id, location.as_ref())
                    .await?,
            ),
        };

        let patch = set_attributes::update_patch(
            &changes,
            location_id,
            set_attributes::next_updated_at(current.updated_at),
        )?;
        let updated = work_orders.update(id, patch, expected_updated_at).await?;

        if check.is_change() {
            let change = StatusChange {
                id: Uuid::new_v4(),
                work_order_id: id,
                tenant_id: current.tenant_id,
                from_status: current.status,
                to_status: updated.status,
                note: note.filter(|n| !n.trim().is_empty()),
                changed_by: user.id,
                changed_at: updated.updated_at,
            };
            // The work order is already written; a missing audit row is reported, not fatal
            if let Err(e) = ActivityRepository::new(self.backend.clone())
                .record_status_change(&change)
                .await
            {
                warn!(error = %e, "Failed to record status change");
            }
        }

        Ok(updated)
    }
}
