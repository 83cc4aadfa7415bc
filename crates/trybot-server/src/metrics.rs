use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use lazy_static::lazy_static;
use prometheus::IntCounter;

use crate::{Result, ServerError};

lazy_static! {
    pub static ref REVIEW_API_CALLS: IntCounter =
        IntCounter::new("review_api_calls", "Review system API calls").unwrap();
    pub static ref CI_API_CALLS: IntCounter =
        IntCounter::new("ci_api_calls", "CI system API calls").unwrap();
    pub static ref TRIGGERS_RECEIVED: IntCounter =
        IntCounter::new("triggers_received", "Trigger events received").unwrap();
    pub static ref BUILDS_OBSERVED: IntCounter =
        IntCounter::new("builds_observed", "Finished builds observed").unwrap();
    pub static ref RESULTS_REPORTED: IntCounter =
        IntCounter::new("results_reported", "Build results reported").unwrap();
}

fn metrics_error<E>(e: E) -> ServerError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    ServerError::MetricsError { source: e.into() }
}

pub(crate) fn build_metrics_handler() -> Result<PrometheusMetrics> {
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .map_err(metrics_error)?;

    setup_process_metrics(&prometheus)?;

    for counter in [
        &*REVIEW_API_CALLS,
        &*CI_API_CALLS,
        &*TRIGGERS_RECEIVED,
        &*BUILDS_OBSERVED,
        &*RESULTS_REPORTED,
    ] {
        prometheus
            .registry
            .register(Box::new(counter.clone()))
            .map_err(metrics_error)?;
    }

    Ok(prometheus)
}

#[cfg(unix)]
fn setup_process_metrics(metrics: &PrometheusMetrics) -> Result<()> {
    use prometheus::process_collector::ProcessCollector;

    metrics
        .registry
        .register(Box::new(ProcessCollector::for_self()))
        .map_err(metrics_error)
}

#[cfg(not(unix))]
fn setup_process_metrics(_metrics: &PrometheusMetrics) -> Result<()> {
    Ok(())
}
