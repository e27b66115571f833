//! Multi-period, per-fund analysis assembled from the metric components.

use crate::domain::{Fund, LeaseRecord, RentRoll, ReportingPeriod};
use crate::error::RentRollError;
use crate::metrics::{
    generate_insights, top_properties, upcoming_expirations, DeltaSummary, ExpiryBands,
    ExpirySchedule, Insight, InsightThresholds, PeriodSnapshot, PropertySummary,
    RentStatistics, RiskProfile, RiskScorer, RiskThresholds, SecurityCoverage,
    UpcomingExpiration, VacancyExposure,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tunables for a portfolio run. Defaults reproduce the standard fund report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub risk: RiskThresholds,
    pub insights: InsightThresholds,
    pub detailed_bands: ExpiryBands,
    pub compact_bands: ExpiryBands,
    pub top_properties: usize,
    pub upcoming_expirations: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            risk: RiskThresholds::default(),
            insights: InsightThresholds::default(),
            detailed_bands: ExpiryBands::detailed(),
            compact_bands: ExpiryBands::compact(),
            top_properties: 10,
            upcoming_expirations: 10,
        }
    }
}

/// Everything reported for one fund across the loaded periods. Per-period
/// series are in chronological order; the rest describe the latest period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundAnalysis {
    pub fund: Fund,
    pub label: &'static str,
    pub snapshots: Vec<PeriodSnapshot>,
    /// One entry per adjacent pair of periods.
    pub deltas: Vec<DeltaSummary>,
    /// First period against last; absent with fewer than two periods.
    pub trend: Option<DeltaSummary>,
    pub risk: Vec<RiskProfile>,
    pub expiry_detailed: ExpirySchedule,
    pub expiry_compact: ExpirySchedule,
    pub upcoming_expirations: Vec<UpcomingExpiration>,
    pub top_properties: Vec<PropertySummary>,
    pub rent_statistics: Option<RentStatistics>,
    pub security: SecurityCoverage,
    pub vacancy: VacancyExposure,
    pub insights: Vec<Insight>,
}

impl FundAnalysis {
    pub fn latest_snapshot(&self) -> Option<&PeriodSnapshot> {
        self.snapshots.last()
    }

    pub fn latest_risk(&self) -> Option<&RiskProfile> {
        self.risk.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioAnalysis {
    pub periods: Vec<ReportingPeriod>,
    /// Tracked funds combined, one snapshot per period.
    pub portfolio: Vec<PeriodSnapshot>,
    pub funds: Vec<FundAnalysis>,
}

impl PortfolioAnalysis {
    /// Rolls are analysed in reference-date order regardless of input order.
    pub fn build(rolls: &[RentRoll], options: &AnalysisOptions) -> Result<Self, RentRollError> {
        let mut rolls: Vec<&RentRoll> = rolls.iter().collect();
        rolls.sort_by_key(|roll| roll.period().reference_date);
        let Some(latest) = rolls.last().copied() else {
            return Err(RentRollError::EmptyPeriodSet);
        };

        let scorer = RiskScorer::new(options.risk.clone());
        let funds = Fund::tracked()
            .into_iter()
            .map(|fund| analyse_fund(fund, &rolls, latest, &scorer, options))
            .collect();

        Ok(Self {
            periods: rolls.iter().map(|roll| roll.period().clone()).collect(),
            portfolio: rolls
                .iter()
                .map(|roll| PeriodSnapshot::compute(roll.period(), roll.tracked()))
                .collect(),
            funds,
        })
    }

    pub fn fund(&self, fund: Fund) -> Option<&FundAnalysis> {
        self.funds.iter().find(|analysis| analysis.fund == fund)
    }
}

fn analyse_fund(
    fund: Fund,
    rolls: &[&RentRoll],
    latest: &RentRoll,
    scorer: &RiskScorer,
    options: &AnalysisOptions,
) -> FundAnalysis {
    let snapshots: Vec<PeriodSnapshot> = rolls
        .iter()
        .map(|roll| PeriodSnapshot::compute(roll.period(), roll.for_fund(fund)))
        .collect();

    let deltas: Vec<DeltaSummary> = rolls
        .windows(2)
        .zip(snapshots.windows(2))
        .map(|(pair, snaps)| {
            DeltaSummary::between(
                &snaps[0],
                &snaps[1],
                pair[0].for_fund(fund),
                pair[1].for_fund(fund),
            )
        })
        .collect();

    let trend = match (rolls, snapshots.as_slice()) {
        ([first, .., last], [first_snap, .., last_snap]) => Some(DeltaSummary::between(
            first_snap,
            last_snap,
            first.for_fund(fund),
            last.for_fund(fund),
        )),
        _ => None,
    };

    let risk: Vec<RiskProfile> = rolls
        .iter()
        .zip(&snapshots)
        .map(|(roll, snapshot)| scorer.score(snapshot, roll.for_fund(fund)))
        .collect();

    let records: Vec<&LeaseRecord> = latest.for_fund(fund).collect();
    let reference_date = latest.period().reference_date;

    let insights = match (snapshots.last(), risk.last()) {
        (Some(snapshot), Some(profile)) => {
            generate_insights(deltas.last(), snapshot, profile, &options.insights)
        }
        _ => Vec::new(),
    };

    info!(
        fund = fund.label(),
        periods = snapshots.len(),
        records = records.len(),
        insights = insights.len(),
        "fund analysed"
    );

    FundAnalysis {
        fund,
        label: fund.label(),
        expiry_detailed: options
            .detailed_bands
            .schedule(records.iter().copied(), reference_date),
        expiry_compact: options
            .compact_bands
            .schedule(records.iter().copied(), reference_date),
        upcoming_expirations: upcoming_expirations(
            records.iter().copied(),
            options.upcoming_expirations,
        ),
        top_properties: top_properties(records.iter().copied(), options.top_properties),
        rent_statistics: RentStatistics::from_records(records.iter().copied()),
        security: SecurityCoverage::from_records(records.iter().copied()),
        vacancy: VacancyExposure::from_records(records.iter().copied()),
        snapshots,
        deltas,
        trend,
        risk,
        insights,
    }
}
