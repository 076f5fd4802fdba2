//! Plain-text rendering of the page state

use mx_coordinator::{Coordinator, EditTarget, FormState, NoticeLevel, ViewMode};
use mx_models::WorkOrder;
use mx_queries::{AssigneeScope, FilterCriteria};

/// Render the current view followed by any notices
pub fn render(state: &Coordinator) -> String {
    let mut lines = Vec::new();
    match state.view_mode() {
        ViewMode::List => list(state, &mut lines),
        ViewMode::Detail => detail(state, &mut lines),
        ViewMode::Form => {
            if let Some(form) = state.form() {
                form_view(form, &mut lines);
            }
        }
        ViewMode::Calendar => calendar(state, &mut lines),
    }
    notices(state, &mut lines);
    lines.join("\n")
}

fn filter_summary(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();
    if !criteria.search.trim().is_empty() {
        parts.push(format!("search={:?}", criteria.search.trim()));
    }
    if !criteria.status.is_all() {
        parts.push(format!("status={}", criteria.status));
    }
    if !criteria.priority.is_all() {
        parts.push(format!("priority={}", criteria.priority));
    }
    if !criteria.category.is_all() {
        parts.push(format!("category={}", criteria.category));
    }
    if criteria.assignee != AssigneeScope::All {
        parts.push(format!("assignee={}", criteria.assignee.as_str()));
    }
    parts.join(", ")
}

fn row(position: usize, work_order: &WorkOrder, selected: bool) -> String {
    format!(
        "{} {:>2}. {:<11} {:<40} {:<7} {}",
        if selected { ">" } else { " " },
        position,
        work_order.status.label(),
        work_order.title,
        work_order.priority.map(|p| p.as_str()).unwrap_or("-"),
        work_order
            .due_date
            .map(|d| format!("due {}", d))
            .unwrap_or_default(),
    )
    .trim_end()
    .to_string()
}

fn list(state: &Coordinator, lines: &mut Vec<String>) {
    let visible = state.visible();
    lines.push(format!(
        "Work orders ({} of {})",
        visible.len(),
        state.records().len()
    ));
    if !state.criteria().is_default() {
        lines.push(format!(
            "Filters ({}): {}",
            state.criteria().active_count(),
            filter_summary(state.criteria())
        ));
    }

    if state.is_loading() && !state.is_loaded() {
        lines.push("Loading work orders...".to_string());
        return;
    }
    if state.records().is_empty() {
        lines.push("No work orders yet. Type `new` to create one.".to_string());
        return;
    }
    if visible.is_empty() {
        lines.push("No work orders match the current filters.".to_string());
        return;
    }

    let selected = state.selection().selected_id;
    for (i, work_order) in visible.iter().enumerate() {
        lines.push(row(i + 1, work_order, selected == Some(work_order.id)));
    }
}

fn detail(state: &Coordinator, lines: &mut Vec<String>) {
    let Some(work_order) = state.selected() else {
        lines.push("Nothing selected.".to_string());
        return;
    };

    lines.push(work_order.title.clone());
    lines.push(format!("  Status:    {}", work_order.status.label()));
    if let Some(priority) = work_order.priority {
        lines.push(format!("  Priority:  {}", priority));
    }
    if let Some(category) = work_order.category {
        lines.push(format!("  Category:  {}", category));
    }
    if !work_order.tags.is_empty() {
        lines.push(format!("  Tags:      {}", work_order.tags.join(", ")));
    }
    if !work_order.assigned_to.is_empty() {
        let names: Vec<String> = work_order
            .assigned_to
            .iter()
            .map(|a| a.display_name())
            .collect();
        lines.push(format!("  Assigned:  {}", names.join(", ")));
    }
    match (work_order.start_date, work_order.due_date) {
        (Some(start), Some(due)) => lines.push(format!("  Dates:     {} to {}", start, due)),
        (None, Some(due)) => lines.push(format!("  Due:       {}", due)),
        (Some(start), None) => lines.push(format!("  Starts:    {}", start)),
        (None, None) => {}
    }
    if let Some(description) = &work_order.description {
        lines.push(String::new());
        lines.push(format!("  {}", description));
    }

    let next: Vec<&str> = work_order
        .status
        .allowed_transitions()
        .iter()
        .map(|s| s.as_str())
        .collect();
    if !next.is_empty() {
        lines.push(format!("  Next:      {}", next.join(", ")));
    }

    let Some(details) = state.details().filter(|d| d.work_order.id == work_order.id) else {
        lines.push("  Loading details...".to_string());
        return;
    };
    if let Some(location) = &details.location {
        lines.push(format!("  Location:  {}", location.name));
    }
    let totals = &details.totals;
    lines.push(format!(
        "  Time:      {}  Cost: {:.2}  Parts: {}",
        totals.time_spent_label(),
        totals.total_cost,
        totals.parts_used
    ));
    if !details.comments.is_empty() {
        lines.push(format!("  Comments:  {}", details.comments.len()));
    }
    if !details.status_history.is_empty() {
        lines.push("  History:".to_string());
        for change in &details.status_history {
            let note = change
                .note
                .as_deref()
                .map(|n| format!(" ({})", n))
                .unwrap_or_default();
            lines.push(format!(
                "    {} {} -> {}{}",
                change.changed_at.format("%Y-%m-%d %H:%M"),
                change.from_status,
                change.to_status,
                note
            ));
        }
    }
}

fn form_view(form: &FormState, lines: &mut Vec<String>) {
    lines.push(match form.target {
        EditTarget::New => "New work order".to_string(),
        EditTarget::Existing(id) => format!("Edit work order {}", id),
    });

    let data = &form.data;
    let location = match &data.location {
        Some(mx_services::LocationRef::Label(label)) => label.clone(),
        Some(mx_services::LocationRef::Id(id)) => id.to_string(),
        None => String::new(),
    };
    let fields = [
        ("title", data.title.clone()),
        ("description", data.description.clone().unwrap_or_default()),
        ("category", data.category.map(|c| c.to_string()).unwrap_or_default()),
        ("priority", data.priority.map(|p| p.to_string()).unwrap_or_default()),
        ("tags", data.tags.join(", ")),
        ("location", location),
        ("start", data.start_date.map(|d| d.to_string()).unwrap_or_default()),
        ("due", data.due_date.map(|d| d.to_string()).unwrap_or_default()),
    ];
    for (name, value) in fields {
        lines.push(format!("  {:<12} {}", name, value).trim_end().to_string());
    }

    for message in form.errors.full_messages() {
        lines.push(format!("  ! {}", message));
    }
    if form.submitting {
        lines.push("  Saving...".to_string());
    }
}

fn calendar(state: &Coordinator, lines: &mut Vec<String>) {
    let (year, month) = state.calendar_month();
    lines.push(format!("Calendar {}-{:02}", year, month));

    let groups = state.calendar();
    let days = groups.month_view(year, month);
    if days.is_empty() {
        lines.push("  Nothing due this month.".to_string());
    }
    for (date, work_orders) in days {
        let titles: Vec<&str> = work_orders.iter().map(|wo| wo.title.as_str()).collect();
        lines.push(format!("  {}  {}", date, titles.join(", ")));
    }
    if !groups.undated.is_empty() {
        lines.push(format!("  {} without a due date", groups.undated.len()));
    }
}

fn notices(state: &Coordinator, lines: &mut Vec<String>) {
    for notice in state.notices() {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        lines.push(format!("[{}] {}", tag, notice.message));
    }
}
