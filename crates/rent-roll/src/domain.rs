use chrono::NaiveDate;
use serde::Serialize;

/// Fund membership derived from a property code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fund {
    Fund2,
    Fund3,
    Other,
    Unknown,
}

impl Fund {
    /// Funds that receive their own metrics; `Other` and `Unknown` rows are
    /// kept for auditing only.
    pub const fn tracked() -> [Self; 2] {
        [Self::Fund2, Self::Fund3]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fund2 => "Fund 2",
            Self::Fund3 => "Fund 3",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }

    pub const fn is_tracked(self) -> bool {
        matches!(self, Self::Fund2 | Self::Fund3)
    }
}

/// A named snapshot date, e.g. "Q2 2025" as of 2025-06-30.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingPeriod {
    pub label: String,
    pub reference_date: NaiveDate,
}

impl ReportingPeriod {
    pub fn new(label: impl Into<String>, reference_date: NaiveDate) -> Self {
        Self {
            label: label.into(),
            reference_date,
        }
    }

    /// The three quarter-end extracts compared by the fund reports.
    pub fn standard_quarters() -> Vec<Self> {
        [
            ("Q4 2024", 2024, 12, 31),
            ("Q1 2025", 2025, 3, 31),
            ("Q2 2025", 2025, 6, 30),
        ]
        .into_iter()
        .filter_map(|(label, year, month, day)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| Self::new(label, date))
        })
        .collect()
    }
}

/// One rent roll row that survived validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaseRecord {
    pub property_raw: String,
    pub property_code: Option<String>,
    pub fund: Fund,
    pub units: Option<String>,
    pub lease_label: Option<String>,
    pub lease_type: Option<String>,
    pub is_vacant: bool,
    pub tenant_name: Option<String>,
    pub area: f64,
    pub lease_from: Option<NaiveDate>,
    pub lease_to: Option<NaiveDate>,
    pub months_to_expiry: f64,
    pub monthly_rent: Option<f64>,
    pub annual_rent: Option<f64>,
    pub annual_rent_per_area: Option<f64>,
    pub security_deposit: Option<f64>,
    pub loc_amount: Option<f64>,
}

impl LeaseRecord {
    pub fn annual_rent_or_zero(&self) -> f64 {
        self.annual_rent.unwrap_or(0.0)
    }

    pub fn monthly_rent_or_zero(&self) -> f64 {
        self.monthly_rent.unwrap_or(0.0)
    }

    /// Area that may participate in aggregates. Rows with missing or
    /// non-positive area never contribute.
    pub fn has_valid_area(&self) -> bool {
        self.area.is_finite() && self.area > 0.0
    }

    pub fn is_occupied(&self) -> bool {
        !self.is_vacant
    }

    /// Property label without the trailing code segment.
    pub fn property_name(&self) -> &str {
        self.property_raw
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
    }
}

/// Normalized lease records for a single reporting period.
#[derive(Debug, Clone, PartialEq)]
pub struct RentRoll {
    period: ReportingPeriod,
    records: Vec<LeaseRecord>,
}

impl RentRoll {
    pub fn new(period: ReportingPeriod, records: Vec<LeaseRecord>) -> Self {
        Self { period, records }
    }

    pub fn period(&self) -> &ReportingPeriod {
        &self.period
    }

    pub fn records(&self) -> &[LeaseRecord] {
        &self.records
    }

    pub fn for_fund(&self, fund: Fund) -> impl Iterator<Item = &LeaseRecord> + Clone + '_ {
        self.records.iter().filter(move |record| record.fund == fund)
    }

    /// Records belonging to any tracked fund.
    pub fn tracked(&self) -> impl Iterator<Item = &LeaseRecord> + Clone + '_ {
        self.records.iter().filter(|record| record.fund.is_tracked())
    }
}
