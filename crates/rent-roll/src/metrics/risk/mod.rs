mod concentration;
mod config;
mod rules;

pub use concentration::{TenantConcentration, TenantExposure};
pub use config::{RiskThresholds, Tier};

use super::snapshot::PeriodSnapshot;
use crate::domain::LeaseRecord;
use rules::{score_signals, RiskSignals};
use serde::Serialize;

/// Number of tenants listed on a risk profile.
pub const TOP_TENANT_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Occupancy,
    LeaseTerm,
    NearTermExpiry,
    Concentration,
}

impl RiskFactor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Occupancy => "Occupancy",
            Self::LeaseTerm => "Lease Term",
            Self::NearTermExpiry => "Near-Term Expiry",
            Self::Concentration => "Tenant Concentration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn from_score(score: u8, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.high_level_min {
            Self::High
        } else if score >= thresholds.medium_level_min {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One sub-score, kept so reports can show where the points came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskComponent {
    pub factor: RiskFactor,
    pub value: f64,
    pub score: u8,
    pub max_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    pub period: String,
    pub top5_concentration: f64,
    pub top10_concentration: f64,
    pub unique_tenants: usize,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub components: Vec<RiskComponent>,
    pub top_tenants: Vec<TenantExposure>,
}

/// Stateless scorer applying [`RiskThresholds`] to a period.
pub struct RiskScorer {
    thresholds: RiskThresholds,
}

impl RiskScorer {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn score<'a, I>(&self, snapshot: &PeriodSnapshot, records: I) -> RiskProfile
    where
        I: IntoIterator<Item = &'a LeaseRecord>,
    {
        let concentration = TenantConcentration::from_records(records);
        let top5_concentration = concentration.top_share(5);
        let top10_concentration = concentration.top_share(10);

        let signals = RiskSignals {
            occupancy_rate: snapshot.occupancy_rate,
            walt: snapshot.walt,
            near_term_expiry_pct: snapshot.near_term_expiry_pct,
            top10_concentration,
        };
        let (components, risk_score) = score_signals(&signals, &self.thresholds);

        RiskProfile {
            period: snapshot.period.clone(),
            top5_concentration,
            top10_concentration,
            unique_tenants: concentration.unique_tenants(),
            risk_score,
            risk_level: RiskLevel::from_score(risk_score, &self.thresholds),
            components,
            top_tenants: concentration
                .tenants
                .into_iter()
                .take(TOP_TENANT_COUNT)
                .collect(),
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(RiskThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{lease, period, vacant};

    #[test]
    fn level_cut_offs() {
        let thresholds = RiskThresholds::default();
        assert_eq!(RiskLevel::from_score(60, &thresholds), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(59, &thresholds), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(30, &thresholds), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(29, &thresholds), RiskLevel::Low);
    }

    #[test]
    fn concentrated_short_fund_scores_high() {
        // 80% occupied, WALT 6 months, everything near term, one tenant.
        let records = [lease("Solo", 4_000.0, 80_000.0, 6.0), vacant(1_000.0)];
        let snapshot = PeriodSnapshot::compute(&period(), &records);
        let profile = RiskScorer::default().score(&snapshot, &records);

        assert_eq!(profile.risk_score, 100);
        assert_eq!(profile.risk_level, RiskLevel::High);
        assert_eq!(profile.unique_tenants, 1);
        assert_eq!(profile.top5_concentration, 100.0);
        assert_eq!(profile.top_tenants.len(), 1);
        assert_eq!(profile.components.len(), 4);
    }

    #[test]
    fn diversified_long_fund_scores_low() {
        let records: Vec<_> = (0..20)
            .map(|i| lease(&format!("Tenant {i}"), 1_000.0, 10_000.0, 72.0))
            .collect();
        let snapshot = PeriodSnapshot::compute(&period(), &records);
        let profile = RiskScorer::default().score(&snapshot, &records);

        assert_eq!(profile.risk_score, 20);
        assert_eq!(profile.risk_level, RiskLevel::Low);
        assert_eq!(profile.top_tenants.len(), TOP_TENANT_COUNT);
        assert!(profile.risk_score <= 100);
    }

    #[test]
    fn enums_serialize_in_snake_case() {
        assert_eq!(
            serde_json::to_value(RiskLevel::High).expect("serializes"),
            "high"
        );
        assert_eq!(
            serde_json::to_value(RiskFactor::NearTermExpiry).expect("serializes"),
            "near_term_expiry"
        );
    }
}
