//! End-to-end flows through the page runtime and the in-memory backend

use std::sync::Arc;

use mx_backend::{Backend, BackendError, MemoryBackend, Operation, Row, Table};
use mx_coordinator::{
    execute, Coordinator, Effect, EditTarget, Event, FormField, NoticeLevel, ViewMode,
    WorkOrdersPage,
};
use mx_core::config::PageConfig;
use mx_core::traits::Id;
use mx_models::{CurrentUser, WorkOrderPriority, WorkOrderStatus};
use mx_services::WorkOrderServices;
use serde_json::json;
use uuid::Uuid;

struct Env {
    backend: Arc<MemoryBackend>,
    user: CurrentUser,
}

fn row(value: serde_json::Value) -> Row {
    value.as_object().cloned().unwrap()
}

fn work_order_row(tenant_id: Id, title: &str, status: &str, created_at: &str) -> (Id, Row) {
    let id = Uuid::new_v4();
    let row = row(json!({
        "id": id,
        "tenant_id": tenant_id,
        "title": title,
        "status": status,
        "priority": "medium",
        "created_at": created_at,
        "updated_at": created_at,
    }));
    (id, row)
}

async fn env() -> Env {
    let user = CurrentUser::new(Uuid::new_v4(), Uuid::new_v4()).with_name("Dana");
    let backend = Arc::new(MemoryBackend::signed_in(user.clone()));
    backend
        .seed(
            Table::Locations,
            vec![row(json!({
                "id": Uuid::new_v4(),
                "tenant_id": user.tenant_id,
                "name": "Plant North",
            }))],
        )
        .await;
    Env { backend, user }
}

async fn seed(env: &Env, title: &str, status: &str, created_at: &str) -> Id {
    let (id, row) = work_order_row(env.user.tenant_id, title, status, created_at);
    env.backend.seed(Table::WorkOrders, vec![row]).await;
    id
}

async fn open_page(env: &Env) -> WorkOrdersPage<MemoryBackend> {
    let services = WorkOrderServices::new(env.backend.clone());
    let mut page = WorkOrdersPage::new(services, &PageConfig::default());
    page.dispatch(Event::PageEntered);
    page.settle().await;
    page
}

fn titles(page: &WorkOrdersPage<MemoryBackend>) -> Vec<String> {
    page.state().visible().iter().map(|wo| wo.title.clone()).collect()
}

#[tokio::test]
async fn test_create_with_only_a_title() {
    let env = env().await;
    seed(&env, "Conveyor Repair", "open", "2024-05-01T08:00:00Z").await;
    let mut page = open_page(&env).await;

    page.dispatch(Event::NewWorkOrder);
    assert_eq!(page.state().view_mode(), ViewMode::Form);
    page.dispatch(Event::FormEdited(FormField::Title("Fix conveyor".into())));
    page.dispatch(Event::FormSubmitted);
    page.settle().await;

    let state = page.state();
    let created = state
        .records()
        .iter()
        .find(|wo| wo.title == "Fix conveyor")
        .expect("created work order fetched");
    assert_eq!(created.status, WorkOrderStatus::Open);
    assert_eq!(created.priority, Some(WorkOrderPriority::Medium));
    assert!(created.tags.is_empty());
    assert_eq!(created.tenant_id, env.user.tenant_id);

    // Newest first, so the policy picked the new record and advanced
    assert_eq!(state.selection().selected_id, Some(created.id));
    assert_eq!(state.view_mode(), ViewMode::Detail);
    assert_eq!(state.selection().editing, None);
    assert!(state.form().is_none());
    assert_eq!(state.notices()[0].level, NoticeLevel::Success);
    assert_eq!(state.details().map(|d| d.work_order.id), Some(created.id));
}

#[tokio::test]
async fn test_create_with_location_label() {
    let env = env().await;
    let mut page = open_page(&env).await;

    page.dispatch(Event::NewWorkOrder);
    page.dispatch(Event::FormEdited(FormField::Title("Inspect boiler".into())));
    page.dispatch(Event::FormEdited(FormField::Location(Some(
        mx_services::LocationRef::Label("plant north ".into()),
    ))));
    page.dispatch(Event::FormSubmitted);
    page.settle().await;

    let details = page.state().details().expect("details loaded");
    assert_eq!(details.location.as_ref().map(|l| l.name.as_str()), Some("Plant North"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let env = env().await;
    seed(&env, "Wrapper Maintenance", "open", "2024-05-01T08:00:00Z").await;
    seed(&env, "Conveyor Repair", "open", "2024-05-02T08:00:00Z").await;
    let mut page = open_page(&env).await;
    assert_eq!(titles(&page), vec!["Conveyor Repair", "Wrapper Maintenance"]);

    page.dispatch(Event::SearchChanged("wrap".into()));
    page.settle().await;
    assert_eq!(titles(&page), vec!["Wrapper Maintenance"]);
    assert_eq!(
        page.state().selected().map(|wo| wo.title.as_str()),
        Some("Wrapper Maintenance")
    );
}

#[tokio::test]
async fn test_resume_work_order_on_hold() {
    let env = env().await;
    let id = seed(&env, "Replace belt", "on_hold", "2024-05-01T08:00:00Z").await;
    let mut page = open_page(&env).await;
    let before = page.state().selected().map(|wo| wo.updated_at).unwrap();

    page.dispatch(Event::StatusChangeRequested {
        id,
        to: WorkOrderStatus::InProgress,
        note: Some("Parts arrived".into()),
    });
    page.settle().await;

    let state = page.state();
    let updated = state.selected().unwrap();
    assert_eq!(updated.status, WorkOrderStatus::InProgress);
    assert!(updated.updated_at > before);

    let history = &state.details().unwrap().status_history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_status, WorkOrderStatus::OnHold);
    assert_eq!(history[0].note.as_deref(), Some("Parts arrived"));
}

#[tokio::test]
async fn test_illegal_transition_raises_notice() {
    let env = env().await;
    let id = seed(&env, "Replace belt", "open", "2024-05-01T08:00:00Z").await;
    let mut page = open_page(&env).await;

    page.dispatch(Event::StatusChangeRequested {
        id,
        to: WorkOrderStatus::Completed,
        note: None,
    });
    page.settle().await;

    let state = page.state();
    assert_eq!(state.selected().unwrap().status, WorkOrderStatus::Open);
    let notice = state.notices().last().unwrap();
    assert!(notice.is_error());
    assert!(notice.message.contains("cannot move from open to completed"));
}

#[tokio::test]
async fn test_edit_and_save() {
    let env = env().await;
    let id = seed(&env, "Replace belt", "open", "2024-05-01T08:00:00Z").await;
    seed(&env, "Conveyor Repair", "open", "2024-05-02T08:00:00Z").await;
    let mut page = open_page(&env).await;

    page.dispatch(Event::EditWorkOrder(id));
    assert_eq!(page.state().view_mode(), ViewMode::Form);
    page.dispatch(Event::FormEdited(FormField::Title("Replace drive belt".into())));
    page.dispatch(Event::FormEdited(FormField::Priority(Some(WorkOrderPriority::High))));
    page.dispatch(Event::FormSubmitted);
    page.settle().await;

    let state = page.state();
    assert_eq!(state.view_mode(), ViewMode::Detail);
    assert_eq!(state.selection().selected_id, Some(id));
    assert_eq!(state.selection().editing, None);
    assert!(state.form().is_none());
    assert_eq!(state.notices().last().unwrap().level, NoticeLevel::Success);

    let saved = state.selected().expect("saved record refetched");
    assert_eq!(saved.title, "Replace drive belt");
    assert_eq!(saved.priority, Some(WorkOrderPriority::High));
    assert_eq!(saved.status, WorkOrderStatus::Open);
    assert!(saved.updated_at > saved.created_at);
    assert_eq!(state.details().map(|d| d.work_order.title.as_str()), Some("Replace drive belt"));
}

#[tokio::test]
async fn test_stale_edit_conflicts() {
    let env = env().await;
    let id = seed(&env, "Replace belt", "open", "2024-05-01T08:00:00Z").await;
    let mut page = open_page(&env).await;

    page.dispatch(Event::EditWorkOrder(id));
    assert_eq!(page.state().selection().editing, Some(EditTarget::Existing(id)));
    page.dispatch(Event::FormEdited(FormField::Title("Replace drive belt".into())));

    // Someone else saves first
    env.backend
        .update(
            Table::WorkOrders,
            id,
            row(json!({ "priority": "high", "updated_at": "2024-05-03T08:00:00Z" })),
            None,
        )
        .await
        .unwrap();

    page.dispatch(Event::FormSubmitted);
    page.settle().await;

    let state = page.state();
    assert_eq!(state.view_mode(), ViewMode::Form);
    let form = state.form().unwrap();
    assert_eq!(form.data.title, "Replace drive belt");
    assert!(!form.submitting);
    assert!(state.notices().last().unwrap().message.contains("Reload"));

    let stored = env.backend.get(Table::WorkOrders, id).await.unwrap().unwrap();
    assert_eq!(stored["title"], json!("Replace belt"));
}

#[tokio::test]
async fn test_create_failure_keeps_form() {
    let env = env().await;
    let mut page = open_page(&env).await;
    env.backend
        .fail_next(Operation::Insert, BackendError::Request("connection reset".into()))
        .await;

    page.dispatch(Event::NewWorkOrder);
    page.dispatch(Event::FormEdited(FormField::Title("Fix conveyor".into())));
    page.dispatch(Event::FormSubmitted);
    page.settle().await;

    let state = page.state();
    assert_eq!(state.view_mode(), ViewMode::Form);
    let form = state.form().unwrap();
    assert_eq!(form.data.title, "Fix conveyor");
    assert!(!form.submitting);
    let notice = state.notices().last().unwrap();
    assert!(notice.is_error());
    assert!(notice.message.contains("connection reset"));
    assert!(env.backend.rows(Table::WorkOrders).await.is_empty());

    // Retry goes through
    page.dispatch(Event::FormSubmitted);
    page.settle().await;
    assert_eq!(page.state().records().len(), 1);
}

fn fetch_effect(effects: Vec<Effect>) -> Effect {
    effects
        .into_iter()
        .find(|e| matches!(e, Effect::FetchWorkOrders { .. }))
        .expect("fetch effect")
}

#[tokio::test]
async fn test_older_fetch_is_discarded() {
    let env = env().await;
    seed(&env, "Conveyor Repair", "open", "2024-05-01T08:00:00Z").await;
    let services = WorkOrderServices::new(env.backend.clone());
    let mut coordinator = Coordinator::default();

    let first = fetch_effect(coordinator.dispatch(Event::PageEntered));
    let first_done = execute(&services, first).await;

    seed(&env, "Wrapper Maintenance", "open", "2024-05-02T08:00:00Z").await;
    let second = fetch_effect(coordinator.dispatch(Event::Refresh));
    let second_done = execute(&services, second).await;

    coordinator.dispatch(second_done);
    assert_eq!(coordinator.records().len(), 2);

    // Resolved earlier but issued earlier too
    coordinator.dispatch(first_done);
    assert_eq!(coordinator.records().len(), 2);
    assert!(!coordinator.is_loading());
}

#[tokio::test]
async fn test_fetch_after_navigation_is_discarded() {
    let env = env().await;
    seed(&env, "Conveyor Repair", "open", "2024-05-01T08:00:00Z").await;
    let services = WorkOrderServices::new(env.backend.clone());
    let mut coordinator = Coordinator::default();

    let fetch = fetch_effect(coordinator.dispatch(Event::PageEntered));
    let done = execute(&services, fetch).await;
    coordinator.dispatch(Event::PageLeft);

    assert!(coordinator.dispatch(done).is_empty());
    assert!(coordinator.records().is_empty());
    assert!(!coordinator.is_loaded());
}

#[tokio::test]
async fn test_signed_out_fetch_reports_error() {
    let env = env().await;
    env.backend.sign_out().await;
    let page = open_page(&env).await;

    let state = page.state();
    assert!(!state.is_loaded());
    assert!(state.notices()[0].message.contains("not signed in"));
}
