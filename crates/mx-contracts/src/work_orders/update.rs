//! Update contract for work orders

use mx_core::error::{ContractError, ValidationErrors};
use mx_core::result::ValidationResult;
use mx_models::{WorkOrder, WorkOrderStatus};

use super::attributes;
use super::base::{WorkOrderBaseContract, WorkOrderData};
use crate::base::{ChangeTracker, Contract, UserContext};

/// Contract for updating an existing work order
pub struct UpdateWorkOrderContract<'a, U: UserContext> {
    base: WorkOrderBaseContract,
    user: &'a U,
    current: &'a WorkOrder,
    changes: ChangeTracker,
}

impl<'a, U: UserContext> UpdateWorkOrderContract<'a, U> {
    pub fn new(user: &'a U, current: &'a WorkOrder) -> Self {
        Self {
            base: WorkOrderBaseContract::new(),
            user,
            current,
            changes: ChangeTracker::new(),
        }
    }

    /// Mark an attribute as changed
    pub fn mark_changed(&mut self, attribute: impl Into<String>) {
        self.changes.mark_changed(attribute);
    }

    /// Check if an attribute was changed
    pub fn is_changed(&self, attribute: &str) -> bool {
        self.changes.is_changed(attribute)
    }

    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    fn validate_same_tenant(&self, errors: &mut ValidationErrors) {
        if self.current.tenant_id != self.user.tenant_id() {
            errors.add_base("Work order belongs to another tenant");
        }
    }

    fn validate_not_archived(&self, errors: &mut ValidationErrors) {
        if self.current.status == WorkOrderStatus::Archived && !self.changes.is_empty() {
            errors.add_base("Archived work orders can't be edited");
        }
    }

    fn validate_writable<T: WorkOrderData>(&self, errors: &mut ValidationErrors) {
        for attribute in self.changes.changed_attributes() {
            if !Contract::<T>::is_writable(self, attribute) {
                errors.merge(
                    ContractError::AttributeNotWritable {
                        attribute: attribute.to_string(),
                    }
                    .into(),
                );
            }
        }
    }
}

impl<'a, U: UserContext, T: WorkOrderData> Contract<T> for UpdateWorkOrderContract<'a, U> {
    fn validate(&self, entity: &T) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_same_tenant(&mut errors);
        self.validate_not_archived(&mut errors);
        self.validate_writable::<T>(&mut errors);

        if let Some(title) = entity.title() {
            self.base.validate_title(title, &mut errors);
        }
        // Dates are checked against the stored value of whichever side is not changing
        let start_date = if self.is_changed(attributes::START_DATE) {
            entity.start_date()
        } else {
            self.current.start_date
        };
        let due_date = if self.is_changed(attributes::DUE_DATE) {
            entity.due_date()
        } else {
            self.current.due_date
        };
        self.base.validate_dates(start_date, due_date, &mut errors);
        if let Some(tags) = entity.tags() {
            self.base.validate_tags(tags, &mut errors);
        }
        self.base
            .validate_location_label(entity.location_label(), &mut errors);

        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(
            attribute,
            attributes::TITLE
                | attributes::DESCRIPTION
                | attributes::CATEGORY
                | attributes::TAGS
                | attributes::STATUS
                | attributes::PRIORITY
                | attributes::ASSIGNED_TO
                | attributes::ASSET
                | attributes::LOCATION
                | attributes::DUE_DATE
                | attributes::START_DATE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work_orders::base::tests::{date, MockPayload};
    use chrono::Utc;
    use mx_models::CurrentUser;
    use uuid::Uuid;

    fn work_order(tenant_id: Uuid, status: WorkOrderStatus) -> WorkOrder {
        WorkOrder {
            id: Uuid::new_v4(),
            tenant_id,
            title: "Original".to_string(),
            description: None,
            category: None,
            tags: vec![],
            status,
            priority: None,
            assigned_to: vec![],
            asset_id: None,
            location_id: None,
            due_date: Some(date(2026, 10, 10)),
            start_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_update() {
        let tenant = Uuid::new_v4();
        let user = CurrentUser::new(Uuid::new_v4(), tenant);
        let current = work_order(tenant, WorkOrderStatus::Open);
        let mut contract = UpdateWorkOrderContract::new(&user, &current);
        contract.mark_changed("title");

        let payload = MockPayload {
            title: Some("Updated".to_string()),
            ..Default::default()
        };
        assert!(contract.validate(&payload).is_ok());
        assert!(contract.is_changed("title"));
    }

    #[test]
    fn test_other_tenant_rejected() {
        let user = CurrentUser::new(Uuid::new_v4(), Uuid::new_v4());
        let current = work_order(Uuid::new_v4(), WorkOrderStatus::Open);
        let contract = UpdateWorkOrderContract::new(&user, &current);

        let errors = contract.validate(&MockPayload::default()).unwrap_err();
        assert!(!errors.base_errors.is_empty());
    }

    #[test]
    fn test_archived_is_read_only() {
        let tenant = Uuid::new_v4();
        let user = CurrentUser::new(Uuid::new_v4(), tenant);
        let current = work_order(tenant, WorkOrderStatus::Archived);
        let mut contract = UpdateWorkOrderContract::new(&user, &current);
        contract.mark_changed("description");

        assert!(contract.validate(&MockPayload::default()).is_err());
    }

    #[test]
    fn test_tenant_not_writable() {
        let tenant = Uuid::new_v4();
        let user = CurrentUser::new(Uuid::new_v4(), tenant);
        let current = work_order(tenant, WorkOrderStatus::Open);
        let mut contract = UpdateWorkOrderContract::new(&user, &current);
        contract.mark_changed("tenant_id");

        let errors = contract.validate(&MockPayload::default()).unwrap_err();
        assert!(errors.has_error("tenant_id"));
    }

    #[test]
    fn test_start_date_checked_against_stored_due_date() {
        let tenant = Uuid::new_v4();
        let user = CurrentUser::new(Uuid::new_v4(), tenant);
        let current = work_order(tenant, WorkOrderStatus::Open);
        let mut contract = UpdateWorkOrderContract::new(&user, &current);
        contract.mark_changed("start_date");

        let payload = MockPayload {
            start_date: Some(date(2026, 10, 20)),
            ..Default::default()
        };
        let errors = contract.validate(&payload).unwrap_err();
        assert!(errors.has_error("due_date"));
    }
}
