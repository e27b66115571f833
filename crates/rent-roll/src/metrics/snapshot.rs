use crate::domain::{LeaseRecord, ReportingPeriod};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Window, in months, for near-term expiry exposure.
pub const NEAR_TERM_MONTHS: f64 = 12.0;

/// Which records feed the WALT denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaltMode {
    /// Non-vacant records only. Used for risk scoring and trends.
    OccupiedOnly,
    /// Vacant area joins the denominator with zero remaining term.
    IncludingVacant,
}

/// Area-weighted mean months to expiry. Zero when no area qualifies.
pub fn walt<'a, I>(records: I, mode: WaltMode) -> f64
where
    I: IntoIterator<Item = &'a LeaseRecord>,
{
    let (weighted, area) = records
        .into_iter()
        .filter(|record| record.has_valid_area())
        .filter(|record| mode == WaltMode::IncludingVacant || record.is_occupied())
        .fold((0.0, 0.0), |(weighted, area), record| {
            (
                weighted + record.area * record.months_to_expiry,
                area + record.area,
            )
        });

    ratio(weighted, area)
}

/// Fund metrics for one reporting date. Rates and shares are percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSnapshot {
    pub period: String,
    pub reference_date: NaiveDate,
    pub property_count: usize,
    pub total_leases: usize,
    pub occupied_leases: usize,
    pub vacant_leases: usize,
    pub total_sf: f64,
    pub occupied_sf: f64,
    pub vacant_sf: f64,
    pub occupancy_rate: f64,
    pub annual_revenue: f64,
    pub monthly_revenue: f64,
    pub avg_rent_psf: f64,
    pub walt: f64,
    pub walt_including_vacant: f64,
    pub near_term_expiry_sf: f64,
    pub near_term_expiry_pct: f64,
}

impl PeriodSnapshot {
    pub fn compute<'a, I>(period: &ReportingPeriod, records: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaseRecord>,
    {
        let records: Vec<&LeaseRecord> = records
            .into_iter()
            .filter(|record| record.has_valid_area())
            .collect();

        let mut properties = BTreeSet::new();
        let mut snapshot = Self::empty(period);

        for record in &records {
            if let Some(code) = record.property_code.as_deref() {
                properties.insert(code);
            }
            snapshot.total_leases += 1;
            snapshot.total_sf += record.area;

            if record.is_vacant {
                snapshot.vacant_leases += 1;
                snapshot.vacant_sf += record.area;
                continue;
            }

            snapshot.occupied_leases += 1;
            snapshot.occupied_sf += record.area;
            snapshot.annual_revenue += record.annual_rent_or_zero();
            snapshot.monthly_revenue += record.monthly_rent_or_zero();
            if record.months_to_expiry <= NEAR_TERM_MONTHS {
                snapshot.near_term_expiry_sf += record.area;
            }
        }

        snapshot.property_count = properties.len();
        snapshot.occupancy_rate = percent(snapshot.occupied_sf, snapshot.total_sf);
        snapshot.avg_rent_psf = ratio(snapshot.annual_revenue, snapshot.occupied_sf);
        snapshot.walt = walt(records.iter().copied(), WaltMode::OccupiedOnly);
        snapshot.walt_including_vacant = walt(records.iter().copied(), WaltMode::IncludingVacant);
        snapshot.near_term_expiry_pct = percent(snapshot.near_term_expiry_sf, snapshot.occupied_sf);
        snapshot
    }

    fn empty(period: &ReportingPeriod) -> Self {
        Self {
            period: period.label.clone(),
            reference_date: period.reference_date,
            property_count: 0,
            total_leases: 0,
            occupied_leases: 0,
            vacant_leases: 0,
            total_sf: 0.0,
            occupied_sf: 0.0,
            vacant_sf: 0.0,
            occupancy_rate: 0.0,
            annual_revenue: 0.0,
            monthly_revenue: 0.0,
            avg_rent_psf: 0.0,
            walt: 0.0,
            walt_including_vacant: 0.0,
            near_term_expiry_sf: 0.0,
            near_term_expiry_pct: 0.0,
        }
    }

    pub fn walt_for(&self, mode: WaltMode) -> f64 {
        match mode {
            WaltMode::OccupiedOnly => self.walt,
            WaltMode::IncludingVacant => self.walt_including_vacant,
        }
    }
}

pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub(crate) fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part * 100.0 / whole
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{approx, lease, period, vacant};

    #[test]
    fn walt_is_zero_without_qualifying_area() {
        assert_eq!(walt(std::iter::empty(), WaltMode::OccupiedOnly), 0.0);
        let only_vacant = [vacant(500.0)];
        assert_eq!(walt(&only_vacant, WaltMode::OccupiedOnly), 0.0);
        assert_eq!(walt(&only_vacant, WaltMode::IncludingVacant), 0.0);
    }

    #[test]
    fn walt_modes_differ_only_in_denominator() {
        let records = [
            lease("A", 1_000.0, 10_000.0, 12.0),
            lease("B", 3_000.0, 30_000.0, 48.0),
            vacant(4_000.0),
        ];
        assert!(approx(walt(&records, WaltMode::OccupiedOnly), 39.0));
        assert!(approx(walt(&records, WaltMode::IncludingVacant), 19.5));
    }

    #[test]
    fn snapshot_partitions_area_between_occupied_and_vacant() {
        let records = [
            lease("A", 1_000.0, 24_000.0, 6.0),
            lease("B", 3_000.0, 36_000.0, 40.0),
            vacant(1_000.0),
        ];
        let snapshot = PeriodSnapshot::compute(&period(), &records);
        assert_eq!(snapshot.total_leases, 3);
        assert_eq!(snapshot.occupied_leases, 2);
        assert_eq!(snapshot.vacant_leases, 1);
        assert_eq!(snapshot.property_count, 1);
        assert!(approx(snapshot.occupied_sf + snapshot.vacant_sf, snapshot.total_sf));
        assert!(approx(snapshot.occupancy_rate, 80.0));
        assert!(approx(snapshot.annual_revenue, 60_000.0));
        assert!(approx(snapshot.monthly_revenue, 5_000.0));
        assert!(approx(snapshot.avg_rent_psf, 15.0));
        assert!(approx(snapshot.near_term_expiry_sf, 1_000.0));
        assert!(approx(snapshot.near_term_expiry_pct, 25.0));
        assert!(approx(snapshot.walt, 31.5));
        assert!(approx(snapshot.walt_for(WaltMode::IncludingVacant), 25.2));
    }

    #[test]
    fn vacant_space_is_excluded_from_revenue() {
        let mut space = vacant(1_000.0);
        space.annual_rent = Some(99_999.0);
        let snapshot = PeriodSnapshot::compute(&period(), [&space]);
        assert_eq!(snapshot.annual_revenue, 0.0);
        assert_eq!(snapshot.vacant_sf, 1_000.0);
        assert_eq!(snapshot.total_sf, 1_000.0);
        assert_eq!(snapshot.avg_rent_psf, 0.0);
        assert_eq!(snapshot.occupancy_rate, 0.0);
    }

    #[test]
    fn records_without_valid_area_never_aggregate() {
        let mut broken = lease("Z", 0.0, 50_000.0, 10.0);
        broken.area = -10.0;
        let snapshot = PeriodSnapshot::compute(&period(), [&broken]);
        assert_eq!(snapshot.total_leases, 0);
        assert_eq!(snapshot.annual_revenue, 0.0);
    }

    #[test]
    fn empty_fund_yields_zeroed_snapshot() {
        let snapshot = PeriodSnapshot::compute(&period(), std::iter::empty());
        assert_eq!(snapshot.occupancy_rate, 0.0);
        assert_eq!(snapshot.walt, 0.0);
        assert_eq!(snapshot.near_term_expiry_pct, 0.0);
        assert_eq!(snapshot.period, "Q2 2025");
    }
}
