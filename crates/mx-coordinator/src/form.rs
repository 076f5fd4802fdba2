//! Form state for creating and editing work orders

use chrono::{DateTime, NaiveDate, Utc};
use mx_contracts::work_orders::CreateWorkOrderContract;
use mx_contracts::Contract;
use mx_core::error::ValidationErrors;
use mx_core::traits::Id;
use mx_models::{AssigneeRef, WorkOrder, WorkOrderCategory, WorkOrderPriority};
use mx_services::{LocationRef, WorkOrderForm};

use crate::view::EditTarget;

/// One edit made in the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Title(String),
    Description(Option<String>),
    Category(Option<WorkOrderCategory>),
    Tags(Vec<String>),
    Priority(Option<WorkOrderPriority>),
    Assignees(Vec<AssigneeRef>),
    Asset(Option<Id>),
    Location(Option<LocationRef>),
    DueDate(Option<NaiveDate>),
    StartDate(Option<NaiveDate>),
}

impl FormField {
    /// Attribute name used for validation errors
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Description(_) => "description",
            Self::Category(_) => "category",
            Self::Tags(_) => "tags",
            Self::Priority(_) => "priority",
            Self::Assignees(_) => "assigned_to",
            Self::Asset(_) => "asset_id",
            Self::Location(_) => "location",
            Self::DueDate(_) => "due_date",
            Self::StartDate(_) => "start_date",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub target: EditTarget,
    pub data: WorkOrderForm,
    pub errors: ValidationErrors,
    /// A create or update is in flight
    pub submitting: bool,
    /// Precondition for the update; `None` when creating
    pub original_updated_at: Option<DateTime<Utc>>,
}

impl FormState {
    pub fn for_new() -> Self {
        Self {
            target: EditTarget::New,
            data: WorkOrderForm::new(),
            errors: ValidationErrors::new(),
            submitting: false,
            original_updated_at: None,
        }
    }

    pub fn for_existing(work_order: &WorkOrder) -> Self {
        Self {
            target: EditTarget::Existing(work_order.id),
            data: WorkOrderForm::from_work_order(work_order),
            errors: ValidationErrors::new(),
            submitting: false,
            original_updated_at: Some(work_order.updated_at),
        }
    }

    pub fn is_new(&self) -> bool {
        self.target == EditTarget::New
    }

    /// Apply an edit and clear the errors of the edited field
    pub fn apply(&mut self, field: FormField) {
        self.errors.errors.remove(field.attribute());
        let data = &mut self.data;
        match field {
            FormField::Title(title) => data.title = title,
            FormField::Description(description) => data.description = description,
            FormField::Category(category) => data.category = category,
            FormField::Tags(tags) => data.tags = tags,
            FormField::Priority(priority) => data.priority = priority,
            FormField::Assignees(assignees) => data.assigned_to = assignees,
            FormField::Asset(asset_id) => data.asset_id = asset_id,
            FormField::Location(location) => data.location = location,
            FormField::DueDate(due_date) => data.due_date = due_date,
            FormField::StartDate(start_date) => data.start_date = start_date,
        }
    }

    /// Client-side validation; the form payload is a full record in both modes
    pub fn validate(&mut self) -> bool {
        match CreateWorkOrderContract::new().validate(&self.data) {
            Ok(()) => {
                self.errors = ValidationErrors::new();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validate_blank_title() {
        let mut form = FormState::for_new();
        assert!(!form.validate());
        assert!(form.errors.has_error("title"));

        form.apply(FormField::Title("Fix conveyor".into()));
        assert!(!form.errors.has_error("title"));
        assert!(form.validate());
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_validate_date_order() {
        let mut form = FormState::for_new();
        form.apply(FormField::Title("Inspect boiler".into()));
        form.apply(FormField::StartDate(NaiveDate::from_ymd_opt(2026, 11, 5)));
        form.apply(FormField::DueDate(NaiveDate::from_ymd_opt(2026, 11, 1)));
        assert!(!form.validate());
        assert!(form.errors.has_error("due_date"));
    }

    #[test]
    fn test_for_existing_keeps_precondition() {
        let mut work_order = WorkOrder::new(Uuid::new_v4(), "Fix conveyor");
        work_order.priority = Some(WorkOrderPriority::High);

        let form = FormState::for_existing(&work_order);
        assert_eq!(form.target, EditTarget::Existing(work_order.id));
        assert_eq!(form.original_updated_at, Some(work_order.updated_at));
        assert_eq!(form.data.priority, Some(WorkOrderPriority::High));
        assert!(!form.is_new());
    }
}
