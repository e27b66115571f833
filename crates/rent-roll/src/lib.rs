//! Rent roll ingestion and fund-level portfolio metrics.
//!
//! Raw lease extracts are normalized into [`domain::LeaseRecord`]s, then
//! aggregated per fund and reporting period into snapshots, period-over-period
//! deltas, risk profiles, expiration schedules and insights.

pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod portfolio;
pub mod telemetry;
