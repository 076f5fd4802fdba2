//! View-mode state

use mx_core::traits::Id;
use std::fmt;

/// Which part of the page is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    List,
    Detail,
    Form,
    Calendar,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
            Self::Form => "form",
            Self::Calendar => "calendar",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the form is editing
///
/// Distinct from the selection: creating a work order starts with no
/// selected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(Id),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_id: Option<Id>,
    pub view_mode: ViewMode,
    pub editing: Option<EditTarget>,
}

impl SelectionState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_selected(&self, id: Id) -> bool {
        self.selected_id == Some(id)
    }
}
