use crate::state::LogoAsset;
use metrics_exporter_prometheus::PrometheusHandle;
use newsclass_features::NewsClassifier;
use std::sync::Arc;

/// Page title shown in the UI
pub const APP_TITLE: &str = "BBC News Classifier";

/// Shared application state
///
/// Everything here is read-only once the server starts.
#[derive(Clone)]
pub struct AppState {
    /// Loaded feature pipeline and classifier
    pub classifier: Arc<NewsClassifier>,

    /// Sidebar logo
    pub logo: Arc<LogoAsset>,

    /// Prometheus exporter, when installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(classifier: Arc<NewsClassifier>, logo: LogoAsset) -> Self {
        Self {
            classifier,
            logo: Arc::new(logo),
            metrics: None,
        }
    }

    /// Attach the handle used to render `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
