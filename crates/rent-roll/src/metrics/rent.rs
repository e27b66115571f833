use super::snapshot::{percent, ratio};
use crate::domain::LeaseRecord;
use serde::Serialize;

/// Distribution of annual rent per area across occupied leases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; zero for a single lease.
    pub std_dev: f64,
    pub p25: f64,
    pub p75: f64,
}

impl RentStatistics {
    /// `None` when no occupied lease carries a rent per area. Zero rent
    /// (free-rent periods) is a value, not a gap.
    pub fn from_records<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LeaseRecord>,
    {
        let mut values: Vec<f64> = records
            .into_iter()
            .filter(|record| record.is_occupied() && record.has_valid_area())
            .filter_map(|record| record.annual_rent_per_area)
            .filter(|value| value.is_finite())
            .collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let squares: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            mean,
            median: quantile(&values, 0.5),
            min: values[0],
            max: values[count - 1],
            std_dev,
            p25: quantile(&values, 0.25),
            p75: quantile(&values, 0.75),
        })
    }
}

// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Deposits and letters of credit held against occupied leases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityCoverage {
    pub total_deposits: f64,
    pub total_letters_of_credit: f64,
    pub monthly_rent: f64,
    /// Months of rent covered by deposits plus letters of credit.
    pub coverage_months: f64,
    /// Leases whose deposit and letter of credit are both recorded as zero.
    /// Unrecorded amounts do not count.
    pub leases_without_security: usize,
    pub leases_without_security_pct: f64,
}

impl SecurityCoverage {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaseRecord>,
    {
        let mut total_deposits = 0.0;
        let mut total_letters_of_credit = 0.0;
        let mut monthly_rent = 0.0;
        let mut occupied = 0usize;
        let mut leases_without_security = 0usize;

        for record in records
            .into_iter()
            .filter(|record| record.is_occupied() && record.has_valid_area())
        {
            occupied += 1;
            monthly_rent += record.monthly_rent_or_zero();
            total_deposits += record.security_deposit.unwrap_or(0.0);
            total_letters_of_credit += record.loc_amount.unwrap_or(0.0);
            if record.security_deposit == Some(0.0) && record.loc_amount == Some(0.0) {
                leases_without_security += 1;
            }
        }

        Self {
            total_deposits,
            total_letters_of_credit,
            monthly_rent,
            coverage_months: ratio(total_deposits + total_letters_of_credit, monthly_rent),
            leases_without_security,
            leases_without_security_pct: percent(leases_without_security as f64, occupied as f64),
        }
    }
}
