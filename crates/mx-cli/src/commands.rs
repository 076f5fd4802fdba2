//! Console command parsing

use chrono::{Datelike, NaiveDate};
use mx_coordinator::{Coordinator, Event, FormField, ViewMode};
use mx_core::traits::Id;
use mx_models::WorkOrderStatus;
use mx_queries::{AssigneeScope, Choice, SortDirection, SortKey, SortOrder};
use mx_services::LocationRef;
use thiserror::Error;
use uuid::Uuid;

pub const HELP: &str = "\
Views:     list | detail | calendar | month <yyyy-mm>
Data:      refresh
Filters:   search [text] | status <s|all> | priority <p|all> | category <c|all>
           assignee <all|me|unassigned> | clear
Sorting:   sort <created_at|updated_at|due_date|priority|title|status> [asc|desc]
Selection: select <n|id>
Editing:   new | edit [n|id] | set <field> <value> | save | cancel
           fields: title, description, category, tags, priority, location, due, start
Workflow:  move <status> [note]
Other:     dismiss | help | quit";

#[derive(Debug, Clone)]
pub enum Command {
    Event(Event),
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command {0:?}; type `help`")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid {what}: {message}")]
    Invalid { what: &'static str, message: String },

    #[error("No work order at position {0}")]
    NoSuchRow(usize),

    #[error("Nothing is selected")]
    NothingSelected,
}

type CommandResult = Result<Command, CommandError>;

fn invalid(what: &'static str) -> impl FnOnce(String) -> CommandError {
    move |message| CommandError::Invalid { what, message }
}

/// Parse one console line against the current page state
pub fn parse(line: &str, state: &Coordinator) -> CommandResult {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let event = match name {
        "" => return Ok(Command::Nothing),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),

        "list" => Event::ViewModeChanged(ViewMode::List),
        "detail" => Event::ViewModeChanged(ViewMode::Detail),
        "calendar" => Event::ViewModeChanged(ViewMode::Calendar),
        "month" => {
            let (year, month) = parse_month(required(rest, "month")?)?;
            Event::CalendarMonthChanged { year, month }
        }
        "refresh" => Event::Refresh,

        "search" => Event::SearchChanged(rest.to_string()),
        "status" => Event::StatusFilterChanged(
            Choice::parse(required(rest, "status")?).map_err(invalid("status"))?,
        ),
        "priority" => Event::PriorityFilterChanged(
            Choice::parse(required(rest, "priority")?).map_err(invalid("priority"))?,
        ),
        "category" => Event::CategoryFilterChanged(
            Choice::parse(required(rest, "category")?).map_err(invalid("category"))?,
        ),
        "assignee" => Event::AssigneeFilterChanged(
            required(rest, "assignee")?
                .parse::<AssigneeScope>()
                .map_err(invalid("assignee"))?,
        ),
        "clear" => Event::FiltersCleared,
        "sort" => Event::SortChanged(parse_sort(rest)?),

        "select" => Event::Select(resolve(required(rest, "row")?, state)?),

        "new" => Event::NewWorkOrder,
        "edit" => {
            let id = if rest.is_empty() {
                state.selection().selected_id.ok_or(CommandError::NothingSelected)?
            } else {
                resolve(rest, state)?
            };
            Event::EditWorkOrder(id)
        }
        "set" => Event::FormEdited(parse_field(rest)?),
        "save" => Event::FormSubmitted,
        "cancel" => Event::FormCancelled,

        "move" => {
            let id = state.selection().selected_id.ok_or(CommandError::NothingSelected)?;
            let (status, note) = match rest.split_once(char::is_whitespace) {
                Some((status, note)) => (status, Some(note.trim().to_string())),
                None => (rest, None),
            };
            let to = required(status, "status")?
                .parse::<WorkOrderStatus>()
                .map_err(invalid("status"))?;
            Event::StatusChangeRequested {
                id,
                to,
                note: note.filter(|n| !n.is_empty()),
            }
        }
        "dismiss" => Event::NoticesDismissed,

        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Command::Event(event))
}

fn required<'a>(value: &'a str, what: &'static str) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::MissingArgument(what))
    } else {
        Ok(value)
    }
}

/// 1-based position in the visible list, or a work order id
fn resolve(arg: &str, state: &Coordinator) -> Result<Id, CommandError> {
    if let Ok(position) = arg.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| state.visible().get(i).map(|wo| wo.id))
            .ok_or(CommandError::NoSuchRow(position));
    }
    Uuid::parse_str(arg).map_err(|e| CommandError::Invalid {
        what: "work order",
        message: e.to_string(),
    })
}

fn parse_month(arg: &str) -> Result<(i32, u32), CommandError> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", arg), "%Y-%m-%d").map_err(|e| {
        CommandError::Invalid {
            what: "month",
            message: e.to_string(),
        }
    })?;
    Ok((date.year(), date.month()))
}

fn parse_sort(rest: &str) -> Result<SortOrder, CommandError> {
    let mut parts = rest.split_whitespace();
    let key = parts.next().ok_or(CommandError::MissingArgument("sort key"))?;
    let key = SortKey::parse(key).ok_or_else(|| CommandError::Invalid {
        what: "sort key",
        message: key.to_string(),
    })?;
    let direction = match parts.next() {
        Some(d) => SortDirection::parse(d).ok_or_else(|| CommandError::Invalid {
            what: "sort direction",
            message: d.to_string(),
        })?,
        None => SortDirection::Asc,
    };
    Ok(SortOrder::by(key, direction))
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>, CommandError> {
    if value == "none" {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| CommandError::Invalid {
            what: "date",
            message: e.to_string(),
        })
}

fn optional(value: &str) -> Option<&str> {
    (value != "none" && !value.is_empty()).then_some(value)
}

fn parse_field(rest: &str) -> Result<FormField, CommandError> {
    let (field, value) = match rest.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (required(rest, "field")?, ""),
    };

    let parsed = match field {
        "title" => FormField::Title(value.to_string()),
        "description" => FormField::Description(optional(value).map(str::to_string)),
        "category" => FormField::Category(
            optional(value)
                .map(str::parse)
                .transpose()
                .map_err(invalid("category"))?,
        ),
        "priority" => FormField::Priority(
            optional(value)
                .map(str::parse)
                .transpose()
                .map_err(invalid("priority"))?,
        ),
        "tags" => FormField::Tags(
            value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        "location" => FormField::Location(optional(value).map(|v| LocationRef::Label(v.to_string()))),
        "due" => FormField::DueDate(parse_date(value)?),
        "start" => FormField::StartDate(parse_date(value)?),
        other => {
            return Err(CommandError::Invalid {
                what: "field",
                message: other.to_string(),
            })
        }
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_models::WorkOrderPriority;

    fn event(line: &str) -> Event {
        match parse(line, &Coordinator::default()) {
            Ok(Command::Event(event)) => event,
            other => panic!("unexpected parse result {:?}", other),
        }
    }

    #[test]
    fn test_parse_filters() {
        assert!(matches!(
            event("status on_hold"),
            Event::StatusFilterChanged(Choice::Only(WorkOrderStatus::OnHold))
        ));
        assert!(matches!(event("priority all"), Event::PriorityFilterChanged(Choice::All)));
        assert!(matches!(event("assignee me"), Event::AssigneeFilterChanged(AssigneeScope::Me)));
        assert!(matches!(event("search  wrap "), Event::SearchChanged(s) if s == "wrap"));
        assert!(matches!(event("search"), Event::SearchChanged(s) if s.is_empty()));
    }

    #[test]
    fn test_parse_form_fields() {
        assert!(matches!(
            event("set priority urgent"),
            Event::FormEdited(FormField::Priority(Some(WorkOrderPriority::Urgent)))
        ));
        assert!(matches!(event("set due none"), Event::FormEdited(FormField::DueDate(None))));
        assert!(matches!(
            event("set tags line-2, belts,,"),
            Event::FormEdited(FormField::Tags(tags)) if tags == vec!["line-2", "belts"]
        ));
        assert!(matches!(
            event("set location Plant North"),
            Event::FormEdited(FormField::Location(Some(LocationRef::Label(l)))) if l == "Plant North"
        ));
    }

    #[test]
    fn test_parse_errors() {
        let state = Coordinator::default();
        assert!(matches!(parse("frobnicate", &state), Err(CommandError::Unknown(_))));
        assert!(matches!(parse("status", &state), Err(CommandError::MissingArgument(_))));
        assert!(matches!(parse("status closed", &state), Err(CommandError::Invalid { .. })));
        assert!(matches!(parse("select 1", &state), Err(CommandError::NoSuchRow(1))));
        assert!(matches!(parse("move completed", &state), Err(CommandError::NothingSelected)));
        assert!(matches!(parse("month 2026-13", &state), Err(CommandError::Invalid { .. })));
        assert!(matches!(parse("   ", &state), Ok(Command::Nothing)));
        assert!(matches!(parse("quit", &state), Ok(Command::Quit)));
    }

    #[test]
    fn test_parse_sort_and_month() {
        match event("sort due_date desc") {
            Event::SortChanged(order) => {
                let primary = order.primary().unwrap();
                assert_eq!(primary.key, SortKey::DueDate);
                assert_eq!(primary.direction, SortDirection::Desc);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(
            event("month 2026-11"),
            Event::CalendarMonthChanged { year: 2026, month: 11 }
        ));
    }
}
