//! Maintenance RS console
//!
//! Drives the work order page from stdin against the in-memory backend,
//! optionally seeded from `MX_SEED_FILE`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mx_backend::MemoryBackend;
use mx_coordinator::{Event, WorkOrdersPage};
use mx_core::config::AppConfig;
use mx_models::CurrentUser;
use mx_services::WorkOrderServices;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

mod commands;
mod render;

use commands::Command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(&config.logging.filter);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend.url,
        anon_key_set = config.backend.anon_key.is_some(),
        request_timeout_seconds = config.backend.request_timeout_seconds,
        enforce_transitions = config.workflow.enforce_transitions,
        "Starting Maintenance RS console"
    );

    let backend = Arc::new(load_backend(&config).await?);
    let services = WorkOrderServices::from_config(backend, &config)?;
    let mut page = WorkOrdersPage::new(services, &config.page);
    let timeout = Duration::from_secs(config.backend.request_timeout_seconds);

    page.dispatch(Event::PageEntered);
    settle(&mut page, timeout).await;
    println!("{}", render::render(page.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match commands::parse(&line, page.state()) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", commands::HELP),
            Ok(Command::Nothing) => {}
            Ok(Command::Event(event)) => {
                page.dispatch(event);
                settle(&mut page, timeout).await;
                println!("{}", render::render(page.state()));
            }
            Err(e) => println!("{}", e),
        }
    }

    page.dispatch(Event::PageLeft);
    info!("Console closed");
    Ok(())
}

/// Drain pending requests, giving up after `timeout`; late completions
/// apply on the next drain
async fn settle(page: &mut WorkOrdersPage<MemoryBackend>, timeout: Duration) {
    if tokio::time::timeout(timeout, page.settle()).await.is_err() {
        warn!(in_flight = page.in_flight(), "Backend requests still pending");
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Seeded backend when a seed file is configured, else an empty demo tenant
async fn load_backend(config: &AppConfig) -> anyhow::Result<MemoryBackend> {
    let Some(path) = &config.backend.seed_file else {
        warn!("MX_SEED_FILE not set; starting with an empty demo tenant");
        let user = CurrentUser::new(Uuid::new_v4(), Uuid::new_v4()).with_name("Demo");
        return Ok(MemoryBackend::signed_in(user));
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path))?;
    let backend = MemoryBackend::from_json(&json)
        .with_context(|| format!("parsing seed file {}", path))?;
    info!(path = %path, "Loaded seed data");
    Ok(backend)
}
