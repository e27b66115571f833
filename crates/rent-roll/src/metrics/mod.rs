//! Fund metrics computed from normalized lease records.

pub mod comparison;
pub mod expiry;
pub mod insights;
pub mod properties;
pub mod rent;
pub mod risk;
pub mod snapshot;

pub use comparison::{revenue_growth_pct, DeltaSummary, TenancyChanges};
pub use expiry::{
    upcoming_expirations, ExpiryBand, ExpiryBands, ExpiryBucket, ExpirySchedule,
    UpcomingExpiration, UPCOMING_EXPIRY_MONTHS,
};
pub use insights::{generate_insights, Insight, InsightCategory, InsightSeverity, InsightThresholds};
pub use properties::{top_properties, PropertySummary, VacancyExposure};
pub use rent::{RentStatistics, SecurityCoverage};
pub use risk::{
    RiskComponent, RiskFactor, RiskLevel, RiskProfile, RiskScorer, RiskThresholds,
    TenantConcentration, TenantExposure, Tier, TOP_TENANT_COUNT,
};
pub use snapshot::{walt, PeriodSnapshot, WaltMode, NEAR_TERM_MONTHS};
