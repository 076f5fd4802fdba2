//! Base contract for work orders

use chrono::NaiveDate;
use mx_core::error::ValidationErrors;
use mx_core::result::ValidationResult;
use validator::Validate;

use super::attributes;
use crate::base::Contract;

pub const TITLE_MAX_LENGTH: usize = 255;
pub const TAG_MAX_LENGTH: usize = 50;

/// Work order payload data for validation
///
/// `None` means the payload does not set the attribute.
pub trait WorkOrderData: Send + Sync {
    fn title(&self) -> Option<&str>;
    fn start_date(&self) -> Option<NaiveDate>;
    fn due_date(&self) -> Option<NaiveDate>;
    fn tags(&self) -> Option<&[String]>;
    fn location_label(&self) -> Option<&str>;
}

/// Length limits on free-text attributes
#[derive(Debug, Validate)]
struct TextLimits<'a> {
    #[validate(length(max = 255, message = "is too long (maximum is 255 characters)"))]
    title: &'a str,
}

/// Validations shared by create and update
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkOrderBaseContract;

impl WorkOrderBaseContract {
    pub fn new() -> Self {
        Self
    }

    /// Validate title is present and within length
    pub fn validate_title(&self, title: &str, errors: &mut ValidationErrors) {
        if title.trim().is_empty() {
            errors.add(attributes::TITLE, "can't be blank");
            return;
        }
        if let Err(e) = (TextLimits { title }).validate() {
            errors.merge(e.into());
        }
    }

    /// Validate the due date does not precede the start date
    pub fn validate_dates(
        &self,
        start_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
        errors: &mut ValidationErrors,
    ) {
        if let (Some(start), Some(due)) = (start_date, due_date) {
            if due < start {
                errors.add(attributes::DUE_DATE, "must be on or after the start date");
            }
        }
    }

    pub fn validate_tags(&self, tags: &[String], errors: &mut ValidationErrors) {
        if tags.iter().any(|t| t.trim().is_empty()) {
            errors.add(attributes::TAGS, "can't contain a blank tag");
        }
        if tags.iter().any(|t| t.chars().count() > TAG_MAX_LENGTH) {
            errors.add(
                attributes::TAGS,
                format!("can't contain a tag longer than {} characters", TAG_MAX_LENGTH),
            );
        }
    }

    pub fn validate_location_label(&self, label: Option<&str>, errors: &mut ValidationErrors) {
        if let Some(label) = label {
            if label.trim().is_empty() {
                errors.add(attributes::LOCATION, "can't be blank");
            }
        }
    }
}

impl<T: WorkOrderData> Contract<T> for WorkOrderBaseContract {
    fn validate(&self, entity: &T) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if let Some(title) = entity.title() {
            self.validate_title(title, &mut errors);
        }
        self.validate_dates(entity.start_date(), entity.due_date(), &mut errors);
        if let Some(tags) = entity.tags() {
            self.validate_tags(tags, &mut errors);
        }
        self.validate_location_label(entity.location_label(), &mut errors);

        errors.into_result()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Default)]
    pub(crate) struct MockPayload {
        pub title: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub due_date: Option<NaiveDate>,
        pub tags: Option<Vec<String>>,
        pub location_label: Option<String>,
    }

    impl WorkOrderData for MockPayload {
        fn title(&self) -> Option<&str> {
            self.title.as_deref()
        }
        fn start_date(&self) -> Option<NaiveDate> {
            self.start_date
        }
        fn due_date(&self) -> Option<NaiveDate> {
            self.due_date
        }
        fn tags(&self) -> Option<&[String]> {
            self.tags.as_deref()
        }
        fn location_label(&self) -> Option<&str> {
            self.location_label.as_deref()
        }
    }

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_payload() {
        let payload = MockPayload {
            title: Some("Replace filter".to_string()),
            start_date: Some(date(2026, 10, 1)),
            due_date: Some(date(2026, 10, 1)),
            tags: Some(vec!["hvac".to_string()]),
            ..Default::default()
        };
        assert!(WorkOrderBaseContract::new().validate(&payload).is_ok());
    }

    #[test]
    fn test_blank_title() {
        let payload = MockPayload {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        let errors = WorkOrderBaseContract::new().validate(&payload).unwrap_err();
        assert!(errors.has_error("title"));
    }

    #[test]
    fn test_title_too_long() {
        let payload = MockPayload {
            title: Some("x".repeat(TITLE_MAX_LENGTH + 1)),
            ..Default::default()
        };
        let errors = WorkOrderBaseContract::new().validate(&payload).unwrap_err();
        assert_eq!(
            errors.get("title"),
            Some(&vec!["is too long (maximum is 255 characters)".to_string()])
        );
    }

    #[test]
    fn test_title_length_counts_characters() {
        let payload = MockPayload {
            title: Some("é".repeat(TITLE_MAX_LENGTH)),
            ..Default::default()
        };
        assert!(WorkOrderBaseContract::new().validate(&payload).is_ok());
    }

    #[test]
    fn test_due_before_start() {
        let payload = MockPayload {
            title: Some("Inspect boiler".to_string()),
            start_date: Some(date(2026, 10, 5)),
            due_date: Some(date(2026, 10, 1)),
            ..Default::default()
        };
        let errors = WorkOrderBaseContract::new().validate(&payload).unwrap_err();
        assert!(errors.has_error("due_date"));
    }

    #[test]
    fn test_blank_tag_and_location() {
        let payload = MockPayload {
            title: Some("Inspect boiler".to_string()),
            tags: Some(vec!["".to_string()]),
            location_label: Some(" ".to_string()),
            ..Default::default()
        };
        let errors = WorkOrderBaseContract::new().validate(&payload).unwrap_err();
        assert!(errors.has_error("tags"));
        assert!(errors.has_error("location"));
    }
}
