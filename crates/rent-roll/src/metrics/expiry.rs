use super::snapshot::percent;
use crate::domain::LeaseRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A band closed on its upper bound; `None` is open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryBand {
    pub label: String,
    pub upper_months: Option<f64>,
}

impl ExpiryBand {
    fn new(label: &str, upper_months: Option<f64>) -> Self {
        Self {
            label: label.to_string(),
            upper_months,
        }
    }

    fn contains(&self, months: f64) -> bool {
        self.upper_months.map_or(true, |upper| months <= upper)
    }
}

/// An ordered band set for bucketing occupied leases by remaining term.
///
/// With an `expired_label`, leases whose expiry date is missing or strictly
/// before the reference date land in that bucket and the first band starts
/// at zero months inclusive. Without one, leases at zero months are left out
/// of the schedule entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryBands {
    pub name: String,
    pub expired_label: Option<String>,
    pub bands: Vec<ExpiryBand>,
}

impl ExpiryBands {
    /// Seven buckets used by the printed fund analysis.
    pub fn detailed() -> Self {
        Self {
            name: "detailed".to_string(),
            expired_label: Some("Expired/Vacant".to_string()),
            bands: vec![
                ExpiryBand::new("0-6 months", Some(6.0)),
                ExpiryBand::new("6-12 months", Some(12.0)),
                ExpiryBand::new("12-24 months", Some(24.0)),
                ExpiryBand::new("24-36 months", Some(36.0)),
                ExpiryBand::new("36-60 months", Some(60.0)),
                ExpiryBand::new("60+ months", None),
            ],
        }
    }

    /// Five buckets used by the dashboard.
    pub fn compact() -> Self {
        Self {
            name: "compact".to_string(),
            expired_label: None,
            bands: vec![
                ExpiryBand::new("0-6 months", Some(6.0)),
                ExpiryBand::new("6-12 months", Some(12.0)),
                ExpiryBand::new("12-24 months", Some(24.0)),
                ExpiryBand::new("24-36 months", Some(36.0)),
                ExpiryBand::new("36+ months", None),
            ],
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.expired_label
            .iter()
            .chain(self.bands.iter().map(|band| &band.label))
            .map(String::as_str)
            .collect()
    }

    /// Index into [`Self::labels`] for a lease, or `None` when it is skipped.
    fn classify(&self, record: &LeaseRecord, reference_date: NaiveDate) -> Option<usize> {
        let offset = match &self.expired_label {
            Some(_) => {
                let expired = record
                    .lease_to
                    .map_or(true, |expiry| expiry < reference_date);
                if expired {
                    return Some(0);
                }
                1
            }
            None => {
                if record.months_to_expiry <= 0.0 {
                    return None;
                }
                0
            }
        };

        self.bands
            .iter()
            .position(|band| band.contains(record.months_to_expiry))
            .map(|index| index + offset)
    }

    /// Every label appears in order, including empty buckets. Vacant records
    /// are ignored.
    pub fn schedule<'a, I>(&self, records: I, reference_date: NaiveDate) -> ExpirySchedule
    where
        I: IntoIterator<Item = &'a LeaseRecord>,
    {
        let mut buckets: Vec<ExpiryBucket> = self
            .labels()
            .into_iter()
            .map(|label| ExpiryBucket {
                label: label.to_string(),
                count: 0,
                area: 0.0,
                annual_rent: 0.0,
                rent_share_pct: 0.0,
            })
            .collect();

        let mut total_rent = 0.0;
        for record in records
            .into_iter()
            .filter(|record| record.has_valid_area() && record.is_occupied())
        {
            total_rent += record.annual_rent_or_zero();
            if let Some(index) = self.classify(record, reference_date) {
                let bucket = &mut buckets[index];
                bucket.count += 1;
                bucket.area += record.area;
                bucket.annual_rent += record.annual_rent_or_zero();
            }
        }

        for bucket in &mut buckets {
            bucket.rent_share_pct = percent(bucket.annual_rent, total_rent);
        }

        ExpirySchedule {
            variant: self.name.clone(),
            buckets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiryBucket {
    pub label: String,
    pub count: usize,
    pub area: f64,
    pub annual_rent: f64,
    /// Share of all occupied rent for the fund/period.
    pub rent_share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpirySchedule {
    pub variant: String,
    pub buckets: Vec<ExpiryBucket>,
}

impl ExpirySchedule {
    pub fn bucket(&self, label: &str) -> Option<&ExpiryBucket> {
        self.buckets.iter().find(|bucket| bucket.label == label)
    }
}

/// Horizon for the upcoming-expirations list.
pub const UPCOMING_EXPIRY_MONTHS: f64 = 24.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingExpiration {
    pub property: String,
    pub tenant: Option<String>,
    pub area: f64,
    pub lease_to: Option<NaiveDate>,
    pub months_to_expiry: f64,
}

/// Largest occupied leases expiring inside the horizon, by area descending.
pub fn upcoming_expirations<'a, I>(records: I, limit: usize) -> Vec<UpcomingExpiration>
where
    I: IntoIterator<Item = &'a LeaseRecord>,
{
    let mut upcoming: Vec<&LeaseRecord> = records
        .into_iter()
        .filter(|record| record.has_valid_area() && record.is_occupied())
        .filter(|record| {
            record.months_to_expiry > 0.0 && record.months_to_expiry <= UPCOMING_EXPIRY_MONTHS
        })
        .collect();

    upcoming.sort_by(|a, b| b.area.partial_cmp(&a.area).unwrap_or(Ordering::Equal));

    upcoming
        .into_iter()
        .take(limit)
        .map(|record| UpcomingExpiration {
            property: record.property_name().to_string(),
            tenant: record.tenant_name.clone(),
            area: record.area,
            lease_to: record.lease_to,
            months_to_expiry: record.months_to_expiry,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{approx, lease, reference_date, vacant};
    use chrono::Duration;

    fn expiring_in(label: &str, area: f64, days: i64) -> LeaseRecord {
        let reference = reference_date();
        let lease_to = reference + Duration::days(days);
        let months = crate::ingest::months_to_expiry(Some(lease_to), false, reference);
        let mut record = lease(label, area, area * 10.0, months);
        record.lease_to = Some(lease_to);
        record
    }

    #[test]
    fn detailed_bands_separate_expired_leases() {
        let records = [
            expiring_in("past", 100.0, -30),
            expiring_in("today", 200.0, 0),
            expiring_in("six", 300.0, 182),
            expiring_in("long", 400.0, 2_000),
            lease("undated", 500.0, 5_000.0, 0.0),
            vacant(10_000.0),
        ];
        let schedule = ExpiryBands::detailed().schedule(&records, reference_date());

        assert_eq!(schedule.variant, "detailed");
        assert_eq!(schedule.buckets.len(), 7);
        let expired = schedule.bucket("Expired/Vacant").expect("expired bucket");
        assert_eq!(expired.count, 2);
        assert!(approx(expired.area, 600.0));
        let near = schedule.bucket("0-6 months").expect("near bucket");
        assert_eq!(near.count, 2);
        assert_eq!(schedule.bucket("60+ months").expect("long").count, 1);
        let total_share: f64 = schedule.buckets.iter().map(|b| b.rent_share_pct).sum();
        assert!(approx(total_share, 100.0));
    }

    #[test]
    fn compact_bands_skip_zero_month_leases() {
        let records = [
            expiring_in("past", 100.0, -30),
            expiring_in("today", 200.0, 0),
            expiring_in("seven", 300.0, 213),
            expiring_in("long", 400.0, 2_000),
        ];
        let schedule = ExpiryBands::compact().schedule(&records, reference_date());

        let labels: Vec<&str> = schedule.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            ["0-6 months", "6-12 months", "12-24 months", "24-36 months", "36+ months"]
        );
        let counted: usize = schedule.buckets.iter().map(|b| b.count).sum();
        assert_eq!(counted, 2);
        assert_eq!(schedule.bucket("6-12 months").expect("bucket").count, 1);
        assert_eq!(schedule.bucket("36+ months").expect("bucket").count, 1);
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        let mut edge = lease("edge", 100.0, 1_000.0, 12.0);
        edge.lease_to = Some(reference_date() + Duration::days(365));
        let schedule = ExpiryBands::compact().schedule([&edge], reference_date());
        assert_eq!(schedule.bucket("6-12 months").expect("bucket").count, 1);
    }

    #[test]
    fn upcoming_expirations_rank_by_area_within_horizon() {
        let records = [
            expiring_in("small", 100.0, 100),
            expiring_in("big", 900.0, 300),
            expiring_in("later", 5_000.0, 1_000),
            expiring_in("gone", 7_000.0, -5),
        ];
        let upcoming = upcoming_expirations(&records, 10);
        let tenants: Vec<_> = upcoming
            .iter()
            .map(|u| u.tenant.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(tenants, ["big", "small"]);
        assert_eq!(upcoming[0].property, "Dock Street");
    }
}
