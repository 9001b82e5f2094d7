use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::events::AuthEvents;
use crate::config::Config;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable blob store. Production: S3/MinIO; tests: in-memory double.
    pub blob: Arc<dyn BlobStore>,
    pub auth_events: AuthEvents,
    pub config: Config,
}
