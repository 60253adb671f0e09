//! Scoreboard sync binary entrypoint wiring the workbook, the webhook dispatcher and the REST API.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoreboard_sync::{
    config::AppConfig,
    dao::sheet_store::MemorySheetStore,
    routes,
    services::{dispatcher::SyncDispatcher, ticker},
    state::{AppState, SharedState, layout::SheetLayout},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    info!(
        webhook = %config.webhook_base_url,
        spreadsheet = %config.spreadsheet_id,
        mode = ?config.mode,
        "configuration loaded"
    );

    let store = match &config.seed_path {
        Some(path) => MemorySheetStore::from_seed_file(path)
            .with_context(|| format!("loading workbook seed from {}", path.display()))?,
        None => MemorySheetStore::new(),
    };
    let dispatcher =
        SyncDispatcher::from_config(&config).context("building webhook dispatcher")?;

    let app_state = AppState::new(
        Arc::new(store),
        dispatcher,
        SheetLayout::default(),
        config.mode,
    );

    // Initial publish runs in the background so the API comes up immediately.
    let setup_state = app_state.clone();
    let sync_interval = config.sync_interval;
    tokio::spawn(async move {
        ticker::run_setup(&setup_state).await;
        ticker::spawn(&setup_state, sync_interval);
    });

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let Ok(mut term) = signal(SignalKind::terminate()) else {
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
