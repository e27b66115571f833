use crate::infra::{deserialize_date, AppState};
use crate::report::ReportDocument;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use rent_roll::domain::{RentRoll, ReportingPeriod};
use rent_roll::error::AppError;
use rent_roll::ingest::RentRollImporter;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct PortfolioReportRequest {
    pub(crate) periods: Vec<PeriodUpload>,
    #[serde(default)]
    pub(crate) include_records: bool,
}

/// One period's rent roll extract, sent inline as CSV text.
#[derive(Debug, Deserialize)]
pub(crate) struct PeriodUpload {
    pub(crate) label: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) reference_date: NaiveDate,
    pub(crate) csv: String,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/portfolio/report", post(portfolio_report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn portfolio_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PortfolioReportRequest>,
) -> Result<Json<ReportDocument>, AppError> {
    let PortfolioReportRequest {
        periods,
        include_records,
    } = payload;

    let rolls = periods
        .into_iter()
        .map(|upload| {
            let period = ReportingPeriod::new(upload.label, upload.reference_date);
            RentRollImporter::from_reader(
                Cursor::new(upload.csv.into_bytes()),
                period,
                &state.classification,
            )
        })
        .collect::<Result<Vec<RentRoll>, _>>()?;

    debug!(periods = rolls.len(), include_records, "portfolio report requested");
    Ok(Json(ReportDocument::build(rolls, include_records)?))
}
