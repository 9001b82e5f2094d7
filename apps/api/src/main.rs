mod analytics;
mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod reminders;
mod resumes;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::events::{AuthEvent, AuthEvents};
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{BlobStore, S3BlobStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging. Tracing targets use underscores, so the
    // package name needs the hyphen replaced for the default filter to match.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Joblin API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (applies pending migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let blob: Arc<dyn BlobStore> = Arc::new(S3BlobStore::from_config(&config).await);
    info!("S3 client initialized");

    // Log auth events for the lifetime of the process
    let auth_events = AuthEvents::new();
    let mut subscription = auth_events.subscribe();
    tokio::spawn(async move {
        while let Some(event) = subscription.next().await {
            match event {
                AuthEvent::SignedIn { user_id } => info!("User {user_id} signed in"),
                AuthEvent::SignedOut { user_id } => info!("User {user_id} signed out"),
            }
        }
    });

    // Build app state
    let state = AppState {
        db,
        blob,
        auth_events,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
