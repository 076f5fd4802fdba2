//! Sort orders for the work order list
//!
//! Records missing the sorted attribute always go last, whatever the
//! direction. Sorting is stable, so equal keys keep the fetch order.

use mx_models::{WorkOrder, WorkOrderStatus};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, newest first)
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Attribute a work order list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    DueDate,
    Priority,
    Title,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::DueDate,
        Self::Priority,
        Self::Title,
        Self::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Title => "title",
            Self::Status => "status",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == s)
    }

    fn compare(&self, a: &WorkOrder, b: &WorkOrder, direction: SortDirection) -> Ordering {
        match self {
            Self::CreatedAt => direction.apply(a.created_at.cmp(&b.created_at)),
            Self::UpdatedAt => direction.apply(a.updated_at.cmp(&b.updated_at)),
            Self::DueDate => present_first(a.due_date, b.due_date, direction),
            Self::Priority => present_first(a.priority, b.priority, direction),
            Self::Title => direction.apply(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
            Self::Status => direction.apply(status_rank(a.status).cmp(&status_rank(b.status))),
        }
    }
}

/// Workflow position, so status sorts follow the lifecycle
fn status_rank(status: WorkOrderStatus) -> usize {
    WorkOrderStatus::ALL
        .iter()
        .position(|s| *s == status)
        .unwrap_or(usize::MAX)
}

fn present_first<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A single sort criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCriterion {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }

    pub fn reversed(mut self) -> Self {
        self.direction = self.direction.reverse();
        self
    }
}

/// Collection of sort criteria, applied in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    criteria: Vec<SortCriterion>,
}

impl Default for SortOrder {
    /// Newest first, matching the backend's list order
    fn default() -> Self {
        Self::by(SortKey::CreatedAt, SortDirection::Desc)
    }
}

impl SortOrder {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            criteria: vec![SortCriterion::new(key, direction)],
        }
    }

    pub fn by_asc(key: SortKey) -> Self {
        Self::by(key, SortDirection::Asc)
    }

    pub fn by_desc(key: SortKey) -> Self {
        Self::by(key, SortDirection::Desc)
    }

    /// Add a tie-breaking criterion (builder pattern)
    pub fn then(mut self, criterion: SortCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn then_asc(self, key: SortKey) -> Self {
        self.then(SortCriterion::asc(key))
    }

    pub fn then_desc(self, key: SortKey) -> Self {
        self.then(SortCriterion::desc(key))
    }

    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    pub fn primary(&self) -> Option<&SortCriterion> {
        self.criteria.first()
    }

    pub fn sorts_by(&self, key: SortKey) -> bool {
        self.criteria.iter().any(|c| c.key == key)
    }

    pub fn compare(&self, a: &WorkOrder, b: &WorkOrder) -> Ordering {
        self.criteria
            .iter()
            .map(|c| c.key.compare(a, b, c.direction))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Sort in place (stable)
    pub fn sort(&self, records: &mut [&WorkOrder]) {
        records.sort_by(|a, b| self.compare(a, b));
    }

    /// Sort owned records in place (stable)
    pub fn sort_owned(&self, records: &mut [WorkOrder]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use mx_models::WorkOrderPriority;
    use uuid::Uuid;

    fn titles(records: &[&WorkOrder]) -> Vec<String> {
        records.iter().map(|wo| wo.title.clone()).collect()
    }

    fn fixtures() -> Vec<WorkOrder> {
        let tenant = Uuid::new_v4();
        let now = Utc::now();

        let mut a = WorkOrder::new(tenant, "alpha");
        a.created_at = now - Duration::days(2);
        a.priority = Some(WorkOrderPriority::Low);
        a.due_date = NaiveDate::from_ymd_opt(2026, 11, 5);

        let mut b = WorkOrder::new(tenant, "Bravo");
        b.created_at = now - Duration::days(1);
        b.status = WorkOrderStatus::Completed;

        let mut c = WorkOrder::new(tenant, "charlie");
        c.created_at = now;
        c.priority = Some(WorkOrderPriority::Urgent);
        c.due_date = NaiveDate::from_ymd_opt(2026, 11, 1);
        c.status = WorkOrderStatus::Draft;

        vec![a, b, c]
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::Asc.reverse(), SortDirection::Desc);
        assert_eq!(SortKey::parse("due_date"), Some(SortKey::DueDate));
        assert_eq!(SortKey::parse("subject"), None);
    }

    #[test]
    fn test_default_is_newest_first() {
        let records = fixtures();
        let mut refs: Vec<&WorkOrder> = records.iter().collect();
        SortOrder::default().sort(&mut refs);
        assert_eq!(titles(&refs), vec!["charlie", "Bravo", "alpha"]);
    }

    #[test]
    fn test_absent_values_last_in_both_directions() {
        let records = fixtures();
        let mut refs: Vec<&WorkOrder> = records.iter().collect();

        SortOrder::by_asc(SortKey::DueDate).sort(&mut refs);
        assert_eq!(titles(&refs), vec!["charlie", "alpha", "Bravo"]);

        SortOrder::by_desc(SortKey::DueDate).sort(&mut refs);
        assert_eq!(titles(&refs), vec!["alpha", "charlie", "Bravo"]);

        SortOrder::by_desc(SortKey::Priority).sort(&mut refs);
        assert_eq!(titles(&refs), vec!["charlie", "alpha", "Bravo"]);
    }

    #[test]
    fn test_title_ignores_case() {
        let records = fixtures();
        let mut refs: Vec<&WorkOrder> = records.iter().rev().collect();
        SortOrder::by_asc(SortKey::Title).sort(&mut refs);
        assert_eq!(titles(&refs), vec!["alpha", "Bravo", "charlie"]);
    }

    #[test]
    fn test_status_follows_workflow_with_tie_break() {
        let mut records = fixtures();
        records[0].status = WorkOrderStatus::Completed;
        let order = SortOrder::by_asc(SortKey::Status).then_asc(SortKey::Title);
        assert!(order.sorts_by(SortKey::Title));

        let mut refs: Vec<&WorkOrder> = records.iter().collect();
        order.sort(&mut refs);
        assert_eq!(titles(&refs), vec!["charlie", "alpha", "Bravo"]);
    }
}
