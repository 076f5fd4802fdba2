//! Create contract for work orders

use mx_core::error::ValidationErrors;
use mx_core::result::ValidationResult;

use super::attributes;
use super::base::{WorkOrderBaseContract, WorkOrderData};
use crate::base::Contract;

/// Contract for creating a new work order
///
/// Runs in the coordinator before submission and again in the create
/// service, so a payload that fails here never reaches the backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateWorkOrderContract {
    base: WorkOrderBaseContract,
}

impl CreateWorkOrderContract {
    pub fn new() -> Self {
        Self {
            base: WorkOrderBaseContract::new(),
        }
    }
}

impl<T: WorkOrderData> Contract<T> for CreateWorkOrderContract {
    fn validate(&self, entity: &T) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        // Title is required on create
        if entity.title().is_none() {
            errors.add(attributes::TITLE, "can't be blank");
        }

        if let Err(base_errors) = self.base.validate(entity) {
            errors.merge(base_errors);
        }

        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(
            attribute,
            attributes::TITLE
                | attributes::DESCRIPTION
                | attributes::CATEGORY
                | attributes::TAGS
                | attributes::PRIORITY
                | attributes::ASSIGNED_TO
                | attributes::ASSET
                | attributes::LOCATION
                | attributes::DUE_DATE
                | attributes::START_DATE
        )
    }
}
