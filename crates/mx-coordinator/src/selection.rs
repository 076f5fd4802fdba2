//! Selection auto-advance policy
//!
//! Runs every time the filtered list is recomputed, never on a view-mode
//! change alone. Rules, in order:
//!
//! 1. Empty list: clear the selection; `detail` falls back to `list`.
//! 2. Selection still in the list: keep it.
//! 3. Otherwise select the first record; `list` advances to `detail`.

use mx_core::traits::Id;

use crate::view::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub selected_id: Option<Id>,
    pub view_mode: ViewMode,
    /// The selected id differs from the previous one
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Rule 3 moves `list` to `detail`
    pub auto_advance: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self { auto_advance: true }
    }
}

impl SelectionPolicy {
    pub fn new(auto_advance: bool) -> Self {
        Self { auto_advance }
    }

    pub fn evaluate(&self, selected: Option<Id>, filtered: &[Id], view_mode: ViewMode) -> SelectionOutcome {
        let Some(first) = filtered.first().copied() else {
            let view_mode = match view_mode {
                ViewMode::Detail => ViewMode::List,
                other => other,
            };
            return SelectionOutcome {
                selected_id: None,
                view_mode,
                changed: selected.is_some(),
            };
        };

        if let Some(id) = selected {
            if filtered.contains(&id) {
                return SelectionOutcome {
                    selected_id: Some(id),
                    view_mode,
                    changed: false,
                };
            }
        }

        let view_mode = match view_mode {
            ViewMode::List if self.auto_advance => ViewMode::Detail,
            other => other,
        };
        SelectionOutcome {
            selected_id: Some(first),
            view_mode,
            changed: selected != Some(first),
        }
    }
}
