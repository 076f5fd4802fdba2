//! Closed payload types for work order mutations

use chrono::NaiveDate;
use mx_contracts::work_orders::{attributes, WorkOrderData};
use mx_core::traits::Id;
use mx_models::{
    AssigneeRef, WorkOrder, WorkOrderCategory, WorkOrderPriority, WorkOrderStatus,
};

/// How a form refers to a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationRef {
    Id(Id),
    /// Display name typed or picked in the form; resolved before writing
    Label(String),
}

/// Create payload, also used as the editable form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkOrderForm {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<WorkOrderCategory>,
    pub tags: Vec<String>,
    /// Unset means the configured default
    pub priority: Option<WorkOrderPriority>,
    pub assigned_to: Vec<AssigneeRef>,
    pub asset_id: Option<Id>,
    pub location: Option<LocationRef>,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
}

impl WorkOrderForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Form prefilled from a stored work order
    pub fn from_work_order(work_order: &WorkOrder) -> Self {
        Self {
            title: work_order.title.clone(),
            description: work_order.description.clone(),
            category: work_order.category,
            tags: work_order.tags.clone(),
            priority: work_order.priority,
            assigned_to: work_order.assigned_to.clone(),
            asset_id: work_order.asset_id,
            location: work_order.location_id.map(LocationRef::Id),
            due_date: work_order.due_date,
            start_date: work_order.start_date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: WorkOrderCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: WorkOrderPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_assignee(mut self, assignee: AssigneeRef) -> Self {
        self.assigned_to.push(assignee);
        self
    }

    pub fn with_location_label(mut self, label: impl Into<String>) -> Self {
        self.location = Some(LocationRef::Label(label.into()));
        self
    }

    pub fn with_location_id(mut self, id: Id) -> Self {
        self.location = Some(LocationRef::Id(id));
        self
    }

    pub fn with_dates(mut self, start_date: Option<NaiveDate>, due_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.due_date = due_date;
        self
    }
}

impl WorkOrderData for WorkOrderForm {
    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn tags(&self) -> Option<&[String]> {
        Some(&self.tags)
    }

    fn location_label(&self) -> Option<&str> {
        match &self.location {
            Some(LocationRef::Label(label)) => Some(label),
            _ => None,
        }
    }
}

/// Update payload: `None` leaves the attribute untouched, `Some(None)`
/// clears a nullable attribute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkOrderChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<WorkOrderCategory>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<Option<WorkOrderPriority>>,
    pub assigned_to: Option<Vec<AssigneeRef>>,
    pub asset_id: Option<Option<Id>>,
    pub location: Option<Option<LocationRef>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub start_date: Option<Option<NaiveDate>>,
}

impl WorkOrderChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields of the form that differ from the stored work order
    pub fn diff(form: &WorkOrderForm, current: &WorkOrder) -> Self {
        fn changed<T: PartialEq + Clone>(new: &T, old: &T) -> Option<T> {
            (new != old).then(|| new.clone())
        }

        let description = form
            .description
            .as_ref()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Self {
            title: changed(&form.title, &current.title),
            description: changed(&description, &current.description),
            category: changed(&form.category, &current.category),
            tags: changed(&form.tags, &current.tags),
            status: None,
            priority: changed(&form.priority, &current.priority),
            assigned_to: changed(&form.assigned_to, &current.assigned_to),
            asset_id: changed(&form.asset_id, &current.asset_id),
            location: changed(&form.location, &current.location_id.map(LocationRef::Id)),
            due_date: changed(&form.due_date, &current.due_date),
            start_date: changed(&form.start_date, &current.start_date),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: WorkOrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: Option<WorkOrderPriority>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_location(mut self, location: Option<LocationRef>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_start_date(mut self, start_date: Option<NaiveDate>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Contract attribute names of the fields being set
    pub fn changed_attributes(&self) -> Vec<&'static str> {
        [
            (self.title.is_some(), attributes::TITLE),
            (self.description.is_some(), attributes::DESCRIPTION),
            (self.category.is_some(), attributes::CATEGORY),
            (self.tags.is_some(), attributes::TAGS),
            (self.status.is_some(), attributes::STATUS),
            (self.priority.is_some(), attributes::PRIORITY),
            (self.assigned_to.is_some(), attributes::ASSIGNED_TO),
            (self.asset_id.is_some(), attributes::ASSET),
            (self.location.is_some(), attributes::LOCATION),
            (self.due_date.is_some(), attributes::DUE_DATE),
            (self.start_date.is_some(), attributes::START_DATE),
        ]
        .into_iter()
        .filter_map(|(set, attribute)| set.then_some(attribute))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.changed_attributes().is_empty()
    }
}

impl WorkOrderData for WorkOrderChanges {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date.flatten()
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date.flatten()
    }

    fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    fn location_label(&self) -> Option<&str> {
        match &self.location {
            Some(Some(LocationRef::Label(label))) => Some(label),
            _ => None,
        }
    }
}
