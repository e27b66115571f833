use super::columns::ColumnMap;
use super::parser::{parse_date, parse_number};
use super::rules::ClassificationRules;
use super::table::{cell, RawTable};
use crate::domain::LeaseRecord;
use crate::error::RentRollError;
use chrono::NaiveDate;
use tracing::debug;

/// Fixed day-to-month conversion shared by every report.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Turns a raw extract into lease records. Rows without a property or with a
/// missing/non-positive area are dropped; malformed fields become `None`.
pub fn normalize_table(
    table: &RawTable,
    reference_date: NaiveDate,
    rules: &ClassificationRules,
) -> Result<Vec<LeaseRecord>, RentRollError> {
    let columns = ColumnMap::bind(table)?;
    let mut records = Vec::with_capacity(table.len());

    for row in table.rows() {
        if let Some(record) = normalize_row(row, &columns, reference_date, rules) {
            records.push(record);
        }
    }

    debug!(
        retained = records.len(),
        dropped = table.len() - records.len(),
        %reference_date,
        "normalized rent roll"
    );

    Ok(records)
}

fn normalize_row(
    row: &[Option<String>],
    columns: &ColumnMap,
    reference_date: NaiveDate,
    rules: &ClassificationRules,
) -> Option<LeaseRecord> {
    let property_raw = cell(row, columns.property)?;
    let area = cell(row, columns.area)
        .and_then(parse_number)
        .filter(|area| *area > 0.0)?;

    let property_code = extract_property_code(property_raw);
    let fund = rules.classify(property_code.as_deref());
    let lease_label = cell(row, columns.lease).map(str::to_string);
    let is_vacant = rules.is_vacant(lease_label.as_deref());
    let tenant_name = lease_label.as_deref().and_then(extract_tenant_name);
    let lease_to = cell(row, columns.lease_to).and_then(parse_date);
    let number = |index: usize| cell(row, index).and_then(parse_number);

    Some(LeaseRecord {
        property_raw: property_raw.to_string(),
        property_code,
        fund,
        units: cell(row, columns.units).map(str::to_string),
        lease_label,
        lease_type: cell(row, columns.lease_type).map(str::to_string),
        is_vacant,
        tenant_name,
        area,
        lease_from: cell(row, columns.lease_from).and_then(parse_date),
        lease_to,
        months_to_expiry: months_to_expiry(lease_to, is_vacant, reference_date),
        monthly_rent: number(columns.monthly_rent),
        annual_rent: number(columns.annual_rent),
        annual_rent_per_area: number(columns.annual_rent_area),
        security_deposit: number(columns.security_deposit),
        loc_amount: number(columns.loc_amount),
    })
}

/// First non-empty parenthesized segment, e.g. `x101` in `Dock St (x101)`.
pub fn extract_property_code(property: &str) -> Option<String> {
    let mut rest = property;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let close = after.find(')')?;
        if close > 0 {
            return Some(after[..close].to_string());
        }
        rest = &after[close + 1..];
    }
    None
}

/// Text ahead of the first `(`, trimmed. `None` when nothing precedes it.
pub fn extract_tenant_name(lease_label: &str) -> Option<String> {
    let name = lease_label.split('(').next().unwrap_or_default().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Never negative; zero for vacant space or a missing expiry date.
pub fn months_to_expiry(
    lease_to: Option<NaiveDate>,
    is_vacant: bool,
    reference_date: NaiveDate,
) -> f64 {
    match lease_to {
        Some(expiry) if !is_vacant => {
            let days = (expiry - reference_date).num_days() as f64;
            (days / DAYS_PER_MONTH).max(0.0)
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fund;
    use crate::ingest::REQUIRED_COLUMNS;

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
    }

    fn table(rows: Vec<Vec<(&str, &str)>>) -> RawTable {
        let headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|cells| {
                headers
                    .iter()
                    .map(|header| {
                        cells
                            .iter()
                            .find(|(column, _)| column == header)
                            .map(|(_, value)| value.to_string())
                    })
                    .collect()
            })
            .collect();
        RawTable::new(headers, rows)
    }

    #[test]
    fn extracts_property_code_from_first_parenthesized_segment() {
        assert_eq!(extract_property_code("Dock St (x101)"), Some("x101".to_string()));
        assert_eq!(extract_property_code("Park () (3204) (z)"), Some("3204".to_string()));
        assert_eq!(extract_property_code("No code here"), None);
        assert_eq!(extract_property_code("Broken (x101"), None);
    }

    #[test]
    fn extracts_tenant_name_before_code() {
        assert_eq!(
            extract_tenant_name("  Acme Logistics (t0042)"),
            Some("Acme Logistics".to_string())
        );
        assert_eq!(extract_tenant_name("VACANT"), Some("VACANT".to_string()));
        assert_eq!(extract_tenant_name("(t0042)"), None);
    }

    #[test]
    fn months_to_expiry_is_clamped_and_zero_for_vacancy() {
        let reference = reference_date();
        let future = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let months = months_to_expiry(Some(future), false, reference);
        assert!((months - 365.0 / DAYS_PER_MONTH).abs() < 1e-12);
        assert_eq!(months_to_expiry(Some(past), false, reference), 0.0);
        assert_eq!(months_to_expiry(Some(future), true, reference), 0.0);
        assert_eq!(months_to_expiry(None, false, reference), 0.0);
    }

    #[test]
    fn vacant_row_without_expiry_is_retained() {
        let table = table(vec![vec![
            ("Property", "Dock St (x101)"),
            ("Lease", "VACANT"),
            ("Area", "1000"),
        ]]);
        let records =
            normalize_table(&table, reference_date(), &ClassificationRules::default())
                .expect("normalizes");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(record.is_vacant);
        assert_eq!(record.months_to_expiry, 0.0);
        assert_eq!(record.fund, Fund::Fund2);
        assert!(record.lease_to.is_none());
    }

    #[test]
    fn drops_rows_without_property_or_positive_area() {
        let table = table(vec![
            vec![("Lease", "Orphan (t1)"), ("Area", "100")],
            vec![("Property", "Dock St (x101)"), ("Area", "0")],
            vec![("Property", "Dock St (x101)"), ("Area", "-5")],
            vec![("Property", "Dock St (x101)"), ("Area", "tbd")],
            vec![("Property", "Dock St (x101)")],
            vec![("Property", "Dock St (x101)"), ("Area", "2,500")],
        ]);
        let records =
            normalize_table(&table, reference_date(), &ClassificationRules::default())
                .expect("normalizes");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].area, 2_500.0);
    }

    #[test]
    fn malformed_fields_become_absent() {
        let table = table(vec![vec![
            ("Property", "Harbor Park (3204)"),
            ("Lease", "Acme Logistics (t0042)"),
            ("Area", "5000"),
            ("Lease_From", "someday"),
            ("Lease_To", "2027-06-30"),
            ("Annual_Rent", "n/a"),
            ("Monthly_Rent", "4,000"),
            ("Security_Deposit", ""),
        ]]);
        let records =
            normalize_table(&table, reference_date(), &ClassificationRules::default())
                .expect("normalizes");
        let record = &records[0];
        assert_eq!(record.fund, Fund::Fund3);
        assert_eq!(record.property_code.as_deref(), Some("3204"));
        assert_eq!(record.tenant_name.as_deref(), Some("Acme Logistics"));
        assert!(record.lease_from.is_none());
        assert!(record.annual_rent.is_none());
        assert_eq!(record.monthly_rent, Some(4_000.0));
        assert!(record.security_deposit.is_none());
        assert!(record.months_to_expiry > 23.0);
    }

    #[test]
    fn missing_code_maps_to_unknown_fund() {
        let table = table(vec![vec![("Property", "Loose Parcel"), ("Area", "10")]]);
        let records =
            normalize_table(&table, reference_date(), &ClassificationRules::default())
                .expect("normalizes");
        assert_eq!(records[0].fund, Fund::Unknown);
        assert!(records[0].property_code.is_none());
    }
}
