use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use health_profiler::config::CollaboratorConfig;
use health_profiler::error::AppError;
use health_profiler::profiler::{
    AdvisoryGenerator, GeminiClient, HealthProfiler, OfflineAdvisor, ScoringConfig, TesseractCli,
};
use metrics_exporter_prometheus::PrometheusHandle;

pub(crate) type ApiProfiler = HealthProfiler<TesseractCli, dyn AdvisoryGenerator>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn default_scoring_config() -> ScoringConfig {
    ScoringConfig::standard()
}

/// Wires the concrete text extraction engine and advisory client.
pub(crate) fn build_profiler(config: &CollaboratorConfig) -> Result<Arc<ApiProfiler>, AppError> {
    let extractor = Arc::new(TesseractCli::new(&config.ocr_binary));
    let advisor: Arc<dyn AdvisoryGenerator> = match &config.gemini {
        Some(settings) => {
            tracing::info!(model = %settings.model, "advisory generation via Gemini");
            Arc::new(GeminiClient::new(settings.clone())?)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; recommendations will use the fixed fallback");
            Arc::new(OfflineAdvisor)
        }
    };

    Ok(Arc::new(HealthProfiler::new(
        extractor,
        advisor,
        default_scoring_config(),
    )))
}
