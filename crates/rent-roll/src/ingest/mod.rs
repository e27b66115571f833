mod columns;
mod normalizer;
mod parser;
mod rules;
mod table;

pub use columns::REQUIRED_COLUMNS;
pub use normalizer::{
    extract_property_code, extract_tenant_name, months_to_expiry, normalize_table,
    DAYS_PER_MONTH,
};
pub use rules::ClassificationRules;
pub use table::RawTable;

use crate::domain::{RentRoll, ReportingPeriod};
use crate::error::RentRollError;
use std::io::Read;
use std::path::Path;

/// Loads one period's rent roll extract into normalized records.
pub struct RentRollImporter;

impl RentRollImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        period: ReportingPeriod,
        rules: &ClassificationRules,
    ) -> Result<RentRoll, RentRollError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, period, rules)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        period: ReportingPeriod,
        rules: &ClassificationRules,
    ) -> Result<RentRoll, RentRollError> {
        let table = parser::parse_table(reader)?;
        Self::from_table(&table, period, rules)
    }

    pub fn from_table(
        table: &RawTable,
        period: ReportingPeriod,
        rules: &ClassificationRules,
    ) -> Result<RentRoll, RentRollError> {
        let records = normalize_table(table, period.reference_date, rules)?;
        Ok(RentRoll::new(period, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn period() -> ReportingPeriod {
        ReportingPeriod::new(
            "Q2 2025",
            NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"),
        )
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = RentRollImporter::from_path(
            "./does-not-exist.csv",
            period(),
            &ClassificationRules::default(),
        )
        .expect_err("expected io error");

        match error {
            RentRollError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_extract_without_required_columns() {
        let csv = "Property,Lease,Area\nDock St (x101),Acme (t1),1000\n";
        let error = RentRollImporter::from_reader(
            Cursor::new(csv),
            period(),
            &ClassificationRules::default(),
        )
        .expect_err("structural failure");
        assert!(matches!(
            error,
            RentRollError::MissingColumn { column: "Units" }
        ));
    }

    #[test]
    fn importer_is_deterministic_for_identical_input() {
        let header = REQUIRED_COLUMNS.join(",");
        let csv = format!(
            "{header}\nDock St (x101),1,Acme (t1),NNN,1000,2024-01-01,2027-01-31,36,1.5,1000,1,12000,12,0,0,2000,0\n"
        );
        let rules = ClassificationRules::default();
        let first = RentRollImporter::from_reader(Cursor::new(csv.clone()), period(), &rules)
            .expect("first import");
        let second = RentRollImporter::from_reader(Cursor::new(csv), period(), &rules)
            .expect("second import");
        assert_eq!(first, second);
        assert_eq!(first.records().len(), 1);
    }
}
