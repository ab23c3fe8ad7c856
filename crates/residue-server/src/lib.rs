#![forbid(unsafe_code)]

use axum::routing::{get, post};
use axum::Router;
use residue_store::{ManifestStore, ReportLog};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod fake_store;
mod http;

pub use config::{validate_startup_config_contract, ServiceConfig};
pub use fake_store::FakeManifestStore;

pub const CRATE_NAME: &str = "residue-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ManifestStore>,
    pub reports: ReportLog,
    pub service: Arc<ServiceConfig>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ManifestStore>, reports: ReportLog, service: ServiceConfig) -> Self {
        Self {
            store,
            reports,
            service: Arc::new(service),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health_handler))
        .route("/v1/config", get(http::handlers::config_handler))
        .route("/v1/assets/manifest", get(http::handlers::manifest_handler))
        .route("/v1/assets/report", post(http::handlers::report_handler))
        .with_state(state)
}
