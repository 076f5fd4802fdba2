//! The work order page state machine

use chrono::{Datelike, Utc};
use mx_core::config::PageConfig;
use mx_core::error::MxError;
use mx_core::traits::Id;
use mx_models::{CurrentUser, WorkOrder};
use mx_queries::{group_by_due_date, CalendarGroups, FilterCriteria, SortOrder};
use mx_services::{WorkOrderChanges, WorkOrderDetails};
use tracing::debug;

use crate::event::{Completion, Effect, Event, Ticket};
use crate::form::FormState;
use crate::notice::Notice;
use crate::selection::SelectionPolicy;
use crate::view::{EditTarget, SelectionState, ViewMode};

/// Owns filter, sort, selection, view-mode and form state for the page
#[derive(Debug, Clone)]
pub struct Coordinator {
    policy: SelectionPolicy,

    session: u64,
    epoch: u64,
    next_seq: u64,
    /// Only this fetch may apply
    latest_fetch: Option<Ticket>,
    latest_details: Option<Ticket>,
    active: bool,

    records: Vec<WorkOrder>,
    current_user: Option<CurrentUser>,
    loaded: bool,
    loading: bool,

    criteria: FilterCriteria,
    sort: SortOrder,
    /// Indexes into `records`, filtered and sorted
    filtered: Vec<usize>,

    selection: SelectionState,
    details: Option<WorkOrderDetails>,
    form: Option<FormState>,
    notices: Vec<Notice>,
    calendar_month: (i32, u32),
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(SelectionPolicy::default())
    }
}

impl Coordinator {
    pub fn new(policy: SelectionPolicy) -> Self {
        let today = Utc::now().date_naive();
        Self {
            policy,
            session: 0,
            epoch: 0,
            next_seq: 0,
            latest_fetch: None,
            latest_details: None,
            active: false,
            records: Vec::new(),
            current_user: None,
            loaded: false,
            loading: false,
            criteria: FilterCriteria::default(),
            sort: SortOrder::default(),
            filtered: Vec::new(),
            selection: SelectionState::default(),
            details: None,
            form: None,
            notices: Vec::new(),
            calendar_month: (today.year(), today.month()),
        }
    }

    pub fn from_config(config: &PageConfig) -> Self {
        Self::new(SelectionPolicy::new(config.auto_advance_to_detail))
    }

    /// Apply one event and return the effects it requires
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::PageEntered => {
                self.session += 1;
                self.epoch += 1;
                self.active = true;
                debug!(session = self.session, "Entered work orders page");
                vec![self.fetch()]
            }
            Event::PageLeft => {
                self.leave();
                vec![]
            }
            Event::Refresh => vec![self.fetch()],

            Event::SearchChanged(search) => {
                self.criteria.search = search;
                self.criteria_changed()
            }
            Event::StatusFilterChanged(status) => {
                self.criteria.status = status;
                self.criteria_changed()
            }
            Event::PriorityFilterChanged(priority) => {
                self.criteria.priority = priority;
                self.criteria_changed()
            }
            Event::CategoryFilterChanged(category) => {
                self.criteria.category = category;
                self.criteria_changed()
            }
            Event::AssigneeFilterChanged(assignee) => {
                self.criteria.assignee = assignee;
                self.criteria_changed()
            }
            Event::FiltersCleared => {
                self.criteria.reset();
                self.criteria_changed()
            }
            Event::SortChanged(sort) => {
                self.sort = sort;
                self.criteria_changed()
            }

            Event::Select(id) => self.select(id),
            Event::ViewModeChanged(mode) => {
                self.change_view(mode);
                vec![]
            }
            Event::CalendarMonthChanged { year, month } => {
                if (1..=12).contains(&month) {
                    self.calendar_month = (year, month);
                }
                vec![]
            }

            Event::NewWorkOrder => {
                self.open_form(FormState::for_new());
                vec![]
            }
            Event::EditWorkOrder(id) => {
                match self.record(id) {
                    Some(work_order) => {
                        let form = FormState::for_existing(work_order);
                        self.open_form(form);
                    }
                    None => self.notices.push(Notice::error("Work order no longer exists")),
                }
                vec![]
            }
            Event::FormEdited(field) => {
                if let Some(form) = self.form.as_mut().filter(|f| !f.submitting) {
                    form.apply(field);
                }
                vec![]
            }
            Event::FormSubmitted => self.submit(),
            Event::FormCancelled => {
                if self.form.as_ref().is_some_and(|f| f.submitting) {
                    debug!("Ignoring cancel while the form is submitting");
                } else {
                    self.close_form();
                }
                vec![]
            }

            Event::StatusChangeRequested { id, to, note } => {
                let Some(expected) = self.record(id).map(|wo| wo.updated_at) else {
                    self.notices.push(Notice::error("Work order no longer exists"));
                    return vec![];
                };
                vec![Effect::TransitionStatus {
                    ticket: self.ticket(),
                    id,
                    to,
                    note,
                    expected_updated_at: Some(expected),
                }]
            }
            Event::NoticesDismissed => {
                self.notices.clear();
                vec![]
            }

            Event::Completed { ticket, completion } => self.complete(ticket, completion),
        }
    }

    fn ticket(&mut self) -> Ticket {
        self.next_seq += 1;
        Ticket {
            session: self.session,
            epoch: self.epoch,
            seq: self.next_seq,
        }
    }

    fn fetch(&mut self) -> Effect {
        let ticket = self.ticket();
        self.latest_fetch = Some(ticket);
        self.loading = true;
        Effect::FetchWorkOrders { ticket }
    }

    fn load_details(&mut self, id: Id) -> Effect {
        let ticket = self.ticket();
        self.latest_details = Some(ticket);
        Effect::LoadDetails { ticket, id }
    }

    /// New epoch: reads issued before it are stale and get reissued
    fn criteria_changed(&mut self) -> Vec<Effect> {
        self.epoch += 1;
        let mut effects = self.recompute();

        if self.latest_fetch.is_some_and(|t| t.epoch != self.epoch) {
            debug!(epoch = self.epoch, "Reissuing fetch superseded by a filter change");
            effects.push(self.fetch());
        }
        if let (Some(pending), Some(id)) = (self.latest_details, self.selection.selected_id) {
            if pending.epoch != self.epoch {
                effects.push(self.load_details(id));
            }
        }
        effects
    }

    fn leave(&mut self) {
        self.session += 1;
        self.epoch += 1;
        self.active = false;
        self.loading = false;
        self.latest_fetch = None;
        self.latest_details = None;
        self.criteria.reset();
        self.selection.clear();
        self.details = None;
        self.form = None;
        self.recompute_filtered();
        debug!(session = self.session, "Left work orders page");
    }

    fn recompute_filtered(&mut self) {
        let user_id = self.current_user.as_ref().map(|u| u.id);
        let mut indexes: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, wo)| self.criteria.matches(wo, user_id))
            .map(|(i, _)| i)
            .collect();
        let records = &self.records;
        let sort = &self.sort;
        indexes.sort_by(|a, b| sort.compare(&records[*a], &records[*b]));
        self.filtered = indexes;
    }

    /// Refilter, then run the selection policy over the new list
    fn recompute(&mut self) -> Vec<Effect> {
        self.recompute_filtered();
        let ids = self.visible_ids();
        let outcome = self
            .policy
            .evaluate(self.selection.selected_id, &ids, self.selection.view_mode);

        if outcome.view_mode != self.selection.view_mode {
            debug!(from = %self.selection.view_mode, to = %outcome.view_mode, "View mode changed by selection policy");
        }
        self.selection.selected_id = outcome.selected_id;
        self.selection.view_mode = outcome.view_mode;

        if !outcome.changed {
            return vec![];
        }
        self.details = None;
        match outcome.selected_id {
            Some(id) => vec![self.load_details(id)],
            None => {
                self.latest_details = None;
                vec![]
            }
        }
    }

    fn select(&mut self, id: Id) -> Vec<Effect> {
        if !self.visible_ids().contains(&id) {
            debug!(%id, "Ignoring selection of a work order that is not listed");
            return vec![];
        }
        if self.form.as_ref().is_some_and(|f| f.submitting) {
            return vec![];
        }
        self.form = None;
        self.selection.editing = None;
        self.selection.view_mode = ViewMode::Detail;

        let reload = !self.selection.is_selected(id) || self.details.is_none();
        self.selection.selected_id = Some(id);
        if reload {
            self.details = None;
            vec![self.load_details(id)]
        } else {
            vec![]
        }
    }

    fn change_view(&mut self, mode: ViewMode) {
        if mode == self.selection.view_mode {
            return;
        }
        match mode {
            ViewMode::Form => {
                debug!("Form mode needs a target; ignoring");
                return;
            }
            ViewMode::Detail if self.selection.selected_id.is_none() => {
                debug!("Nothing selected; staying in {}", self.selection.view_mode);
                return;
            }
            _ => {}
        }
        if self.form.as_ref().is_some_and(|f| f.submitting) {
            return;
        }
        self.form = None;
        self.selection.editing = None;
        self.selection.view_mode = mode;
    }

    fn open_form(&mut self, form: FormState) {
        if self.form.as_ref().is_some_and(|f| f.submitting) {
            return;
        }
        debug!(edit_target = ?form.target, "Opening work order form");
        self.selection.editing = Some(form.target);
        self.selection.view_mode = ViewMode::Form;
        self.form = Some(form);
    }

    fn close_form(&mut self) {
        self.form = None;
        self.selection.editing = None;
        self.selection.view_mode = if self.selection.selected_id.is_some() {
            ViewMode::Detail
        } else {
            ViewMode::List
        };
    }

    fn submit(&mut self) -> Vec<Effect> {
        let Some(form) = self.form.as_mut() else {
            return vec![];
        };
        if form.submitting {
            debug!("Submit already in flight; ignoring");
            return vec![];
        }
        if !form.validate() {
            debug!(errors = %form.errors, "Form failed local validation");
            return vec![];
        }

        match form.target {
            EditTarget::New => {
                form.submitting = true;
                let data = form.data.clone();
                vec![Effect::CreateWorkOrder {
                    ticket: self.ticket(),
                    form: data,
                }]
            }
            EditTarget::Existing(id) => {
                let Some(current) = self.records.iter().find(|wo| wo.id == id) else {
                    self.notices.push(Notice::error("Work order no longer exists"));
                    return vec![];
                };
                let changes = WorkOrderChanges::diff(&form.data, current);
                if changes.is_empty() {
                    self.notices.push(Notice::info("No changes to save"));
                    self.close_form();
                    return vec![];
                }
                form.submitting = true;
                let expected_updated_at = form.original_updated_at;
                vec![Effect::UpdateWorkOrder {
                    ticket: self.ticket(),
                    id,
                    changes,
                    expected_updated_at,
                }]
            }
        }
    }

    fn complete(&mut self, ticket: Ticket, completion: Completion) -> Vec<Effect> {
        if ticket.session != self.session {
            debug!(
                session = ticket.session,
                current = self.session,
                "Dropping completion from a previous page session"
            );
            return vec![];
        }

        match completion {
            Completion::Fetched(result) => {
                if self.latest_fetch != Some(ticket) {
                    debug!(seq = ticket.seq, epoch = ticket.epoch, "Dropping superseded fetch");
                    return vec![];
                }
                self.latest_fetch = None;
                self.loading = false;
                match result {
                    Ok(fetched) => {
                        debug!(count = fetched.work_orders.len(), "Work orders fetched");
                        self.records = fetched.work_orders;
                        self.current_user = Some(fetched.current_user);
                        self.loaded = true;
                        self.recompute()
                    }
                    Err(e) => {
                        self.notices
                            .push(Notice::from_error("Could not load work orders", &e));
                        vec![]
                    }
                }
            }
            Completion::Created(result) => match result {
                Ok(work_order) => {
                    self.form = None;
                    self.selection.clear();
                    self.details = None;
                    self.latest_details = None;
                    self.notices.push(Notice::success(format!(
                        "Work order \"{}\" created",
                        work_order.title
                    )));
                    vec![self.fetch()]
                }
                Err(e) => {
                    self.submit_failed("Could not create work order", e);
                    vec![]
                }
            },
            Completion::Updated(result) => match result {
                Ok(work_order) => {
                    self.form = None;
                    self.selection.editing = None;
                    self.selection.selected_id = Some(work_order.id);
                    self.selection.view_mode = ViewMode::Detail;
                    self.notices.push(Notice::success(format!(
                        "Work order \"{}\" saved",
                        work_order.title
                    )));
                    let fetch = self.fetch();
                    vec![fetch, self.load_details(work_order.id)]
                }
                Err(e) => {
                    self.submit_failed("Could not save work order", e);
                    vec![]
                }
            },
            Completion::StatusChanged { id, result } => match result {
                Ok(work_order) => {
                    self.notices.push(Notice::success(format!(
                        "Status changed to {}",
                        work_order.status.label()
                    )));
                    let mut effects = vec![self.fetch()];
                    if self.selection.is_selected(id) {
                        effects.push(self.load_details(id));
                    }
                    effects
                }
                Err(e) => {
                    self.notices
                        .push(Notice::from_error("Could not change status", &e));
                    vec![]
                }
            },
            Completion::DetailsLoaded { id, result } => {
                if !self.selection.is_selected(id) || self.latest_details != Some(ticket) {
                    debug!(%id, "Dropping details for a work order no longer selected");
                    return vec![];
                }
                self.latest_details = None;
                match result {
                    Ok(details) => self.details = Some(details),
                    Err(e) => {
                        self.details = None;
                        self.notices
                            .push(Notice::from_error("Could not load work order details", &e));
                    }
                }
                vec![]
            }
        }
    }

    fn submit_failed(&mut self, context: &str, err: MxError) {
        if let Some(form) = self.form.as_mut() {
            form.submitting = false;
            if let MxError::Validation(errors) = &err {
                form.errors = errors.clone();
            }
        }
        self.notices.push(Notice::from_error(context, &err));
    }

    fn record(&self, id: Id) -> Option<&WorkOrder> {
        self.records.iter().find(|wo| wo.id == id)
    }

    fn visible_ids(&self) -> Vec<Id> {
        self.visible().iter().map(|wo| wo.id).collect()
    }

    // Accessors

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// At least one fetch has been applied
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn records(&self) -> &[WorkOrder] {
        &self.records
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> &SortOrder {
        &self.sort
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn view_mode(&self) -> ViewMode {
        self.selection.view_mode
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn details(&self) -> Option<&WorkOrderDetails> {
        self.details.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn calendar_month(&self) -> (i32, u32) {
        self.calendar_month
    }

    /// Filtered and sorted work orders
    pub fn visible(&self) -> Vec<&WorkOrder> {
        self.filtered
            .iter()
            .filter_map(|i| self.records.get(*i))
            .collect()
    }

    pub fn selected(&self) -> Option<&WorkOrder> {
        self.selection.selected_id.and_then(|id| self.record(id))
    }

    /// Visible work orders grouped by due date
    pub fn calendar(&self) -> CalendarGroups<'_> {
        group_by_due_date(self.visible())
    }

    /// Nothing to show although records were fetched
    pub fn is_filtered_empty(&self) -> bool {
        self.loaded && self.filtered.is_empty() && !self.records.is_empty()
    }
}
