use job_portal::config::StoreConfig;
use job_portal::error::AppError;
use job_portal::jobs::MemoryJobStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Open the document store handle shared by every request.
pub(crate) fn open_store(config: &StoreConfig) -> Result<Arc<MemoryJobStore>, AppError> {
    let store = MemoryJobStore::open(config)?;
    Ok(Arc::new(store))
}

/// Resolves on Ctrl-C so the server can drain before the store is closed.
pub(crate) async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => warn!(error = %err, "failed to listen for shutdown signal"),
    }
}
