//! Work order filters
//!
//! A [`FilterCriteria`] is ephemeral page state. It is never sent to the
//! backend and is reset when the page is left.

use mx_core::traits::Id;
use mx_models::{WorkOrder, WorkOrderCategory, WorkOrderPriority, WorkOrderStatus};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Wire literal for "no restriction"
pub const ALL: &str = "all";

/// A filter value that is either unrestricted or one exact value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    /// `All` matches anything; `Only` needs the value to be present and equal
    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => value == Some(expected),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: FromStr> Choice<T> {
    /// Parse `"all"` or a value literal
    pub fn parse(s: &str) -> Result<Self, T::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => value.fmt(f),
        }
    }
}

impl<T: Serialize> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str(ALL),
            Self::Only(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T> Deserialize<'de> for Choice<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

/// Which assignees a work order must have to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeScope {
    #[default]
    All,
    /// Assigned to the acting user
    Me,
    Unassigned,
}

impl AssigneeScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Me => "me",
            Self::Unassigned => "unassigned",
        }
    }

    pub fn matches(&self, work_order: &WorkOrder, current_user: Option<Id>) -> bool {
        match self {
            Self::All => true,
            Self::Me => current_user
                .map(|user_id| work_order.is_assigned_to(user_id))
                .unwrap_or(false),
            Self::Unassigned => work_order.is_unassigned(),
        }
    }
}

impl FromStr for AssigneeScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "me" => Ok(Self::Me),
            "unassigned" => Ok(Self::Unassigned),
            other => Err(format!("unknown assignee scope {:?}", other)),
        }
    }
}

/// Filter criteria for the work order list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the title
    pub search: String,
    pub status: Choice<WorkOrderStatus>,
    pub priority: Choice<WorkOrderPriority>,
    pub category: Choice<WorkOrderCategory>,
    pub assignee: AssigneeScope,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status(mut self, status: Choice<WorkOrderStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Choice<WorkOrderPriority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: Choice<WorkOrderCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn with_assignee(mut self, assignee: AssigneeScope) -> Self {
        self.assignee = assignee;
        self
    }

    /// Whether the work order should be visible
    pub fn matches(&self, work_order: &WorkOrder, current_user: Option<Id>) -> bool {
        self.matches_search(&work_order.title)
            && self.status.matches(Some(&work_order.status))
            && self.priority.matches(work_order.priority.as_ref())
            && self.category.matches(work_order.category.as_ref())
            && self.assignee.matches(work_order, current_user)
    }

    fn matches_search(&self, title: &str) -> bool {
        let needle = self.search.trim();
        needle.is_empty() || title.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Visible work orders, in input order
    pub fn apply<'a>(&self, records: &'a [WorkOrder], current_user: Option<Id>) -> Vec<&'a WorkOrder> {
        records
            .iter()
            .filter(|wo| self.matches(wo, current_user))
            .collect()
    }

    /// No filter is restricting the list
    pub fn is_default(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of restricting filters
    pub fn active_count(&self) -> usize {
        [
            !self.search.trim().is_empty(),
            !self.status.is_all(),
            !self.priority.is_all(),
            !self.category.is_all(),
            self.assignee != AssigneeScope::All,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_models::AssigneeRef;
    use uuid::Uuid;

    fn records() -> Vec<WorkOrder> {
        let tenant = Uuid::new_v4();
        let mut wrapper = WorkOrder::new(tenant, "Wrapper Maintenance");
        wrapper.priority = Some(WorkOrderPriority::High);
        wrapper.category = Some(WorkOrderCategory::Maintenance);

        let mut conveyor = WorkOrder::new(tenant, "Conveyor Repair");
        conveyor.status = WorkOrderStatus::InProgress;

        let mut boiler = WorkOrder::new(tenant, "Inspect boiler");
        boiler.status = WorkOrderStatus::OnHold;
        boiler.priority = Some(WorkOrderPriority::Low);
        boiler.category = Some(WorkOrderCategory::Inspection);

        vec![wrapper, conveyor, boiler]
    }

    #[test]
    fn test_default_criteria_match_everything() {
        let criteria = FilterCriteria::default();
        let records = records();
        assert!(criteria.is_default());
        assert!(records.iter().all(|wo| criteria.matches(wo, None)));
        assert_eq!(criteria.apply(&records, None).len(), records.len());
    }

    #[test]
    fn test_whitespace_search_matches() {
        let criteria = FilterCriteria::default().with_search("   ");
        assert!(criteria.is_default());
        assert!(criteria.matches(&records()[0], None));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = records();
        let criteria = FilterCriteria::default().with_search("wrap");
        assert!(criteria.matches(&records[0], None));
        assert!(!criteria.matches(&records[1], None));

        let criteria = FilterCriteria::default().with_search("REPAIR");
        assert!(criteria.matches(&records[1], None));
    }

    #[test]
    fn test_other_status_rejects() {
        for wo in records() {
            for status in WorkOrderStatus::ALL {
                let criteria = FilterCriteria::default().with_status(Choice::Only(status));
                assert_eq!(criteria.matches(&wo, None), status == wo.status);
            }
        }
    }

    #[test]
    fn test_absent_field_never_matches_specific_value() {
        let records = records();
        // conveyor has no priority or category
        let by_priority = FilterCriteria::default().with_priority(Choice::Only(WorkOrderPriority::Medium));
        assert!(!by_priority.matches(&records[1], None));

        let by_category = FilterCriteria::default().with_category(Choice::Only(WorkOrderCategory::Repair));
        assert!(!by_category.matches(&records[1], None));
    }

    #[test]
    fn test_assignee_scope() {
        let me = Uuid::new_v4();
        let mut records = records();
        records[0].assigned_to.push(AssigneeRef::named(me, "Dana"));
        records[1].assigned_to.push(AssigneeRef::new(Uuid::new_v4()));

        let mine = FilterCriteria::default().with_assignee(AssigneeScope::Me);
        let visible = mine.apply(&records, Some(me));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Wrapper Maintenance");
        assert!(mine.apply(&records, None).is_empty());

        let unassigned = FilterCriteria::default().with_assignee(AssigneeScope::Unassigned);
        let visible = unassigned.apply(&records, Some(me));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Inspect boiler");
    }

    #[test]
    fn test_apply_is_idempotent_and_ordered() {
        let records = records();
        let criteria = FilterCriteria::default().with_search("r");
        let once: Vec<WorkOrder> = criteria.apply(&records, None).into_iter().cloned().collect();
        let twice: Vec<WorkOrder> = criteria.apply(&once, None).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(once[0].title, "Wrapper Maintenance");
        assert_eq!(once[1].title, "Conveyor Repair");
    }

    #[test]
    fn test_active_count_and_reset() {
        let mut criteria = FilterCriteria::default()
            .with_search("pump")
            .with_status(Choice::Only(WorkOrderStatus::Open))
            .with_assignee(AssigneeScope::Me);
        assert_eq!(criteria.active_count(), 3);

        criteria.reset();
        assert!(criteria.is_default());
    }

    #[test]
    fn test_choice_wire_format() {
        let criteria = FilterCriteria::default().with_status(Choice::Only(WorkOrderStatus::OnHold));
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["status"], "on_hold");
        assert_eq!(json["priority"], "all");
        assert_eq!(json["assignee"], "all");

        let parsed: FilterCriteria = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, criteria);

        assert_eq!(Choice::<WorkOrderPriority>::parse("ALL"), Ok(Choice::All));
        assert!(Choice::<WorkOrderPriority>::parse("critical").is_err());
    }
}
