//! Base contract system

use std::collections::BTreeSet;

use mx_core::result::ValidationResult;
use mx_core::traits::Id;
use mx_models::CurrentUser;

/// Acting user as seen by contracts
pub trait UserContext: Send + Sync {
    fn id(&self) -> Id;
    fn tenant_id(&self) -> Id;
}

impl UserContext for CurrentUser {
    fn id(&self) -> Id {
        self.id
    }

    fn tenant_id(&self) -> Id {
        self.tenant_id
    }
}

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the payload
    fn validate(&self, entity: &T) -> ValidationResult;

    /// Check if an attribute is writable
    fn is_writable(&self, _attribute: &str) -> bool {
        true
    }
}

/// Change tracking for update contracts
#[derive(Debug, Default, Clone)]
pub struct ChangeTracker {
    changed_attributes: BTreeSet<String>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_changed(&mut self, attribute: impl Into<String>) {
        self.changed_attributes.insert(attribute.into());
    }

    pub fn is_changed(&self, attribute: &str) -> bool {
        self.changed_attributes.contains(attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.changed_attributes.is_empty()
    }

    /// Changed attribute names in alphabetical order
    pub fn changed_attributes(&self) -> impl Iterator<Item = &str> {
        self.changed_attributes.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_tracker() {
        let mut tracker = ChangeTracker::new();
        assert!(tracker.is_empty());
        assert!(!tracker.is_changed("title"));

        tracker.mark_changed("title");
        tracker.mark_changed("due_date");
        assert!(tracker.is_changed("title"));
        assert!(!tracker.is_changed("description"));
        assert_eq!(
            tracker.changed_attributes().collect::<Vec<_>>(),
            vec!["due_date", "title"]
        );
    }
}
