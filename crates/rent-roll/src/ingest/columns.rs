use super::table::RawTable;
use crate::error::RentRollError;

/// Columns every rent roll extract must carry, in export order.
pub const REQUIRED_COLUMNS: [&str; 17] = [
    "Property",
    "Units",
    "Lease",
    "Lease_Type",
    "Area",
    "Lease_From",
    "Lease_To",
    "Term",
    "Tenancy_Years",
    "Monthly_Rent",
    "Monthly_Rent_Area",
    "Annual_Rent",
    "Annual_Rent_Area",
    "Annual_Rec_Area",
    "Annual_Misc_Area",
    "Security_Deposit",
    "LOC_Amount",
];

/// Positions of the columns the normalizer reads.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnMap {
    pub(crate) property: usize,
    pub(crate) units: usize,
    pub(crate) lease: usize,
    pub(crate) lease_type: usize,
    pub(crate) area: usize,
    pub(crate) lease_from: usize,
    pub(crate) lease_to: usize,
    pub(crate) monthly_rent: usize,
    pub(crate) annual_rent: usize,
    pub(crate) annual_rent_area: usize,
    pub(crate) security_deposit: usize,
    pub(crate) loc_amount: usize,
}

impl ColumnMap {
    /// Fails on the first required column that is absent from the header.
    pub(crate) fn bind(table: &RawTable) -> Result<Self, RentRollError> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = table
                .column_index(column)
                .ok_or(RentRollError::MissingColumn { column })?;
        }

        Ok(Self {
            property: positions[0],
            units: positions[1],
            lease: positions[2],
            lease_type: positions[3],
            area: positions[4],
            lease_from: positions[5],
            lease_to: positions[6],
            monthly_rent: positions[9],
            annual_rent: positions[11],
            annual_rent_area: positions[12],
            security_deposit: positions[15],
            loc_amount: positions[16],
        })
    }
}
