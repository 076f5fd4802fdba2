//! # mx-coordinator
//!
//! The work order page as one explicit state machine.
//!
//! [`Coordinator::dispatch`] takes an [`Event`], updates filter, selection
//! and view-mode state, and returns the [`Effect`]s (backend calls) the
//! event requires. It never awaits anything. [`WorkOrdersPage`] runs those
//! effects as tokio tasks against the services and feeds their completions
//! back in as events.
//!
//! Every effect carries a [`Ticket`]; completions whose ticket is stale
//! (older page session, superseded fetch, selection moved on) are dropped.

pub mod coordinator;
pub mod event;
pub mod form;
pub mod notice;
pub mod runtime;
pub mod selection;
pub mod view;

pub use coordinator::Coordinator;
pub use event::{Completion, Effect, Event, Ticket};
pub use form::{FormField, FormState};
pub use notice::{Notice, NoticeLevel};
pub use runtime::{execute, WorkOrdersPage};
pub use selection::{SelectionOutcome, SelectionPolicy};
pub use view::{EditTarget, SelectionState, ViewMode};
