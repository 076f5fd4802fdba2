//! Page runtime: runs effects as tokio tasks and feeds completions back

use mx_backend::Backend;
use mx_core::config::PageConfig;
use mx_services::WorkOrderServices;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::coordinator::Coordinator;
use crate::event::{Completion, Effect, Event};

/// Run one effect against the services and wrap its outcome as an event
pub async fn execute<B: Backend>(services: &WorkOrderServices<B>, effect: Effect) -> Event {
    let ticket = effect.ticket();
    debug!(effect = effect.name(), session = ticket.session, seq = ticket.seq, "Running effect");

    let completion = match effect {
        Effect::FetchWorkOrders { .. } => Completion::Fetched(services.list().await),
        Effect::CreateWorkOrder { form, .. } => Completion::Created(services.create(form).await),
        Effect::UpdateWorkOrder {
            id,
            changes,
            expected_updated_at,
            ..
        } => Completion::Updated(services.update(id, changes, expected_updated_at).await),
        Effect::TransitionStatus {
            id,
            to,
            note,
            expected_updated_at,
            ..
        } => Completion::StatusChanged {
            id,
            result: services
                .transition(id, to, note, expected_updated_at)
                .await,
        },
        Effect::LoadDetails { id, .. } => Completion::DetailsLoaded {
            id,
            result: services.details(id).await,
        },
    };

    Event::Completed { ticket, completion }
}

/// The work order page wired to a backend
///
/// State changes happen only in [`WorkOrdersPage::dispatch`]; spawned tasks
/// talk back over the channel.
pub struct WorkOrdersPage<B: Backend + 'static> {
    coordinator: Coordinator,
    services: WorkOrderServices<B>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    in_flight: usize,
}

impl<B: Backend + 'static> WorkOrdersPage<B> {
    pub fn new(services: WorkOrderServices<B>, config: &PageConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            coordinator: Coordinator::from_config(config),
            services,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn services(&self) -> &WorkOrderServices<B> {
        &self.services
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply an event and start the effects it produced
    pub fn dispatch(&mut self, event: Event) {
        for effect in self.coordinator.dispatch(event) {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        self.in_flight += 1;
        let services = self.services.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = execute(&services, effect).await;
            // The receiver lives as long as the page
            let _ = tx.send(event);
        });
    }

    /// Wait for one completion and apply it
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(event) => {
                self.in_flight -= 1;
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Apply completions until no effect is in flight
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }
}
