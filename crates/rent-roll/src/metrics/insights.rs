use super::comparison::DeltaSummary;
use super::risk::{RiskLevel, RiskProfile};
use super::snapshot::PeriodSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
    Success,
    Warning,
    Danger,
}

impl InsightSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Occupancy,
    Revenue,
    LeaseTerm,
    Expiry,
    Risk,
}

impl InsightCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Occupancy => "Occupancy",
            Self::Revenue => "Revenue",
            Self::LeaseTerm => "Lease Term",
            Self::Expiry => "Expiry",
            Self::Risk => "Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub severity: InsightSeverity,
    pub message: String,
    pub recommendation: String,
}

/// Rule cut-offs. Every comparison is strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Occupancy swing, in percentage points, that earns a finding.
    pub occupancy_change_pp: f64,
    /// Revenue growth or decline, in percent, that earns a finding.
    pub revenue_growth_pct: f64,
    /// WALT, in months, below which the lease book is flagged.
    pub walt_floor_months: f64,
    /// Near-term expiry share, in percent, above which rollover is flagged.
    pub near_term_expiry_pct: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            occupancy_change_pp: 2.0,
            revenue_growth_pct: 5.0,
            walt_floor_months: 36.0,
            near_term_expiry_pct: 20.0,
        }
    }
}

/// Applies the threshold rules in a fixed order: occupancy, revenue, lease
/// term, expiry, risk. Delta-based rules are skipped when there is no prior
/// period to compare against.
pub fn generate_insights(
    delta: Option<&DeltaSummary>,
    latest: &PeriodSnapshot,
    risk: &RiskProfile,
    thresholds: &InsightThresholds,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let period = latest.period.as_str();

    if let Some(delta) = delta {
        let occupancy_change = delta.occupancy_change;
        if occupancy_change < -thresholds.occupancy_change_pp {
            insights.push(insight(
                InsightCategory::Occupancy,
                InsightSeverity::Warning,
                format!(
                    "Occupancy declined {:.1}pp in {period}",
                    occupancy_change.abs()
                ),
                "Implement aggressive leasing campaign with concessions",
            ));
        } else if occupancy_change > thresholds.occupancy_change_pp {
            insights.push(insight(
                InsightCategory::Occupancy,
                InsightSeverity::Success,
                format!("Occupancy improved {occupancy_change:.1}pp in {period}"),
                "Maintain momentum with selective rent increases",
            ));
        }

        let revenue_growth = delta.revenue_growth_pct;
        if revenue_growth < -thresholds.revenue_growth_pct {
            insights.push(insight(
                InsightCategory::Revenue,
                InsightSeverity::Danger,
                format!(
                    "Revenue declined {:.1}% quarter-over-quarter",
                    revenue_growth.abs()
                ),
                "Focus on tenant retention and backfill vacant space",
            ));
        } else if revenue_growth > thresholds.revenue_growth_pct {
            insights.push(insight(
                InsightCategory::Revenue,
                InsightSeverity::Success,
                format!("Revenue grew {revenue_growth:.1}% in {period}"),
                "Continue rent optimization strategy",
            ));
        }
    }

    if latest.walt < thresholds.walt_floor_months {
        insights.push(insight(
            InsightCategory::LeaseTerm,
            InsightSeverity::Warning,
            format!(
                "WALT is only {:.1} months, below the {:.0}-month threshold",
                latest.walt, thresholds.walt_floor_months
            ),
            "Prioritize long-term lease renewals with incentives",
        ));
    }

    if latest.near_term_expiry_pct > thresholds.near_term_expiry_pct {
        insights.push(insight(
            InsightCategory::Expiry,
            InsightSeverity::Warning,
            format!(
                "{:.1}% of occupied space expires within 12 months",
                latest.near_term_expiry_pct
            ),
            "Proactively engage tenants with leases expiring in the next 12 months",
        ));
    }

    if risk.risk_level == RiskLevel::High {
        insights.push(insight(
            InsightCategory::Risk,
            InsightSeverity::Danger,
            format!("Portfolio risk level is {}", risk.risk_level.label()),
            "Immediate executive attention required",
        ));
    }

    insights
}

fn insight(
    category: InsightCategory,
    severity: InsightSeverity,
    message: String,
    recommendation: &str,
) -> Insight {
    Insight {
        category,
        severity,
        message,
        recommendation: recommendation.to_string(),
    }
}
