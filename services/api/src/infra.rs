use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rent_roll::domain::ReportingPeriod;
use rent_roll::ingest::ClassificationRules;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) classification: Arc<ClassificationRules>,
}

/// One `--period` argument: a label, its reference date and the extract path.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PeriodInput {
    pub(crate) period: ReportingPeriod,
    pub(crate) path: PathBuf,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Parses `LABEL,YYYY-MM-DD,PATH`. The path may itself contain commas.
pub(crate) fn parse_period_input(raw: &str) -> Result<PeriodInput, String> {
    let mut parts = raw.splitn(3, ',');
    let (Some(label), Some(date), Some(path)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected LABEL,YYYY-MM-DD,PATH but got '{raw}'"));
    };

    let label = label.trim();
    let path = path.trim();
    if label.is_empty() || path.is_empty() {
        return Err(format!("period label and path must not be empty in '{raw}'"));
    }

    Ok(PeriodInput {
        period: ReportingPeriod::new(label, parse_date(date)?),
        path: PathBuf::from(path),
    })
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}
