use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::export::Exporter;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: ResumeStore,
    /// Pluggable auth collaborator. Default: MockAuthProvider.
    pub auth: Arc<dyn AuthProvider>,
    pub exporter: Arc<Exporter>,
    pub config: Config,
}
