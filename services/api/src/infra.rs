use chrono::NaiveDateTime;
use flight_desk::config::AppConfig;
use flight_desk::context::DeskContext;
use flight_desk::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) desk: Arc<DeskContext>,
}

/// Loads configuration and every startup artifact for one-shot CLI commands.
pub(crate) fn load_desk() -> Result<Arc<DeskContext>, AppError> {
    let config = AppConfig::load()?;
    let desk = DeskContext::load(&config.data)?;
    info!(sentiment = desk.sentiment().is_some(), "desk context ready");
    Ok(Arc::new(desk))
}

const DEPARTURE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

pub(crate) fn parse_departure(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    DEPARTURE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD HH:MM"))
}
