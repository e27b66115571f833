use super::snapshot::PeriodSnapshot;
use crate::domain::LeaseRecord;
use serde::Serialize;
use std::collections::BTreeSet;

/// Movement between two snapshots of the same fund.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaSummary {
    pub from_period: String,
    pub to_period: String,
    /// Percentage points.
    pub occupancy_change: f64,
    pub revenue_growth_pct: f64,
    /// Months.
    pub walt_change: f64,
    pub new_leases: usize,
    pub lost_leases: usize,
    pub net_absorption: f64,
}

impl DeltaSummary {
    pub fn between<'a, P, C>(
        prior: &PeriodSnapshot,
        current: &PeriodSnapshot,
        prior_records: P,
        current_records: C,
    ) -> Self
    where
        P: IntoIterator<Item = &'a LeaseRecord>,
        C: IntoIterator<Item = &'a LeaseRecord>,
    {
        let changes = TenancyChanges::between(prior_records, current_records);

        Self {
            from_period: prior.period.clone(),
            to_period: current.period.clone(),
            occupancy_change: current.occupancy_rate - prior.occupancy_rate,
            revenue_growth_pct: revenue_growth_pct(prior.annual_revenue, current.annual_revenue),
            walt_change: current.walt - prior.walt,
            new_leases: changes.added.len(),
            lost_leases: changes.lost.len(),
            net_absorption: current.occupied_sf - prior.occupied_sf,
        }
    }
}

/// Growth relative to the prior period; zero when there was no prior revenue.
pub fn revenue_growth_pct(prior: f64, current: f64) -> f64 {
    if prior > 0.0 {
        (current - prior) * 100.0 / prior
    } else {
        0.0
    }
}

/// Tenancies are identified by their raw lease label, so a renewal booked
/// under a new label shows up as one lost and one added tenancy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenancyChanges {
    pub added: Vec<String>,
    pub lost: Vec<String>,
}

impl TenancyChanges {
    pub fn between<'a, P, C>(prior: P, current: C) -> Self
    where
        P: IntoIterator<Item = &'a LeaseRecord>,
        C: IntoIterator<Item = &'a LeaseRecord>,
    {
        let prior = occupied_labels(prior);
        let current = occupied_labels(current);

        Self {
            added: current.difference(&prior).map(|label| label.to_string()).collect(),
            lost: prior.difference(&current).map(|label| label.to_string()).collect(),
        }
    }
}

fn occupied_labels<'a, I>(records: I) -> BTreeSet<&'a str>
where
    I: IntoIterator<Item = &'a LeaseRecord>,
{
    records
        .into_iter()
        .filter(|record| record.has_valid_area() && record.is_occupied())
        .filter_map(|record| record.lease_label.as_deref())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{approx, lease, period, vacant};
    use crate::domain::ReportingPeriod;
    use chrono::NaiveDate;

    fn labelled(label: &str) -> LeaseRecord {
        let mut record = lease(label, 1_000.0, 10_000.0, 24.0);
        record.lease_label = Some(label.to_string());
        record
    }

    fn prior_period() -> ReportingPeriod {
        ReportingPeriod::new("Q1 2025", NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())
    }

    #[test]
    fn set_difference_counts_new_and_lost_tenancies() {
        let prior = [labelled("A"), labelled("B"), labelled("C")];
        let current = [labelled("B"), labelled("C"), labelled("D")];
        let changes = TenancyChanges::between(&prior, &current);
        assert_eq!(changes.added, vec!["D".to_string()]);
        assert_eq!(changes.lost, vec!["A".to_string()]);
    }

    #[test]
    fn vacant_labels_do_not_count_as_tenancies() {
        let prior = [labelled("A"), vacant(500.0)];
        let current = [labelled("A")];
        let changes = TenancyChanges::between(&prior, &current);
        assert!(changes.added.is_empty());
        assert!(changes.lost.is_empty());
    }

    #[test]
    fn relabelled_renewal_counts_as_churn() {
        let prior = [labelled("Acme (t1)")];
        let current = [labelled("Acme (t1-R)")];
        let changes = TenancyChanges::between(&prior, &current);
        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.lost.len(), 1);
    }

    #[test]
    fn revenue_growth_handles_boundaries() {
        assert_eq!(revenue_growth_pct(100_000_000.0, 95_000_000.0), -5.0);
        assert!(revenue_growth_pct(100_000_000.0, 94_990_000.0) < -5.0);
        assert_eq!(revenue_growth_pct(0.0, 1_000.0), 0.0);
    }

    #[test]
    fn delta_summary_tracks_absorption_and_walt() {
        let prior_records = [labelled("A"), labelled("B"), vacant(2_000.0)];
        let mut grown = labelled("C");
        grown.area = 2_000.0;
        grown.months_to_expiry = 60.0;
        let current_records = [labelled("A"), labelled("B"), grown];

        let prior = PeriodSnapshot::compute(&prior_period(), &prior_records);
        let current = PeriodSnapshot::compute(&period(), &current_records);
        let delta = DeltaSummary::between(&prior, &current, &prior_records, &current_records);

        assert_eq!(delta.from_period, "Q1 2025");
        assert_eq!(delta.to_period, "Q2 2025");
        assert!(approx(delta.occupancy_change, 50.0));
        assert!(approx(delta.net_absorption, 2_000.0));
        assert!(approx(delta.walt_change, 18.0));
        assert!(approx(delta.revenue_growth_pct, 50.0));
        assert_eq!(delta.new_leases, 1);
        assert_eq!(delta.lost_leases, 0);
    }
}
