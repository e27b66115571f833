use super::snapshot::{percent, ratio};
use crate::domain::LeaseRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Per-property rollup of area and rent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySummary {
    pub property_code: Option<String>,
    pub name: String,
    pub leases: usize,
    pub area: f64,
    pub occupied_area: f64,
    pub annual_rent: f64,
    pub has_vacancy: bool,
}

impl PropertySummary {
    pub fn occupancy_rate(&self) -> f64 {
        percent(self.occupied_area, self.area)
    }
}

/// Groups records by property and returns the `limit` highest-rent
/// properties. Ties keep property-code order.
pub fn top_properties<'a, I>(records: I, limit: usize) -> Vec<PropertySummary>
where
    I: IntoIterator<Item = &'a LeaseRecord>,
{
    let mut properties = group_by_property(records).into_values().collect::<Vec<_>>();
    properties.sort_by(|left, right| right.annual_rent.total_cmp(&left.annual_rent));
    properties.truncate(limit);
    properties
}

fn group_by_property<'a, I>(records: I) -> BTreeMap<(Option<String>, String), PropertySummary>
where
    I: IntoIterator<Item = &'a LeaseRecord>,
{
    let mut grouped = BTreeMap::new();
    for record in records.into_iter().filter(|record| record.has_valid_area()) {
        let key = (record.property_code.clone(), record.property_raw.clone());
        let entry = grouped.entry(key).or_insert_with(|| PropertySummary {
            property_code: record.property_code.clone(),
            name: record.property_name().to_string(),
            leases: 0,
            area: 0.0,
            occupied_area: 0.0,
            annual_rent: 0.0,
            has_vacancy: false,
        });
        entry.leases += 1;
        entry.area += record.area;
        if record.is_vacant {
            entry.has_vacancy = true;
        } else {
            entry.occupied_area += record.area;
            entry.annual_rent += record.annual_rent_or_zero();
        }
    }
    grouped
}

/// Size of the vacancy problem and the rent it leaves on the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacancyExposure {
    pub properties_with_vacancy: usize,
    pub total_properties: usize,
    pub vacant_spaces: usize,
    pub vacant_sf: f64,
    pub avg_occupied_rent_psf: f64,
    /// Vacant area priced at the mean occupied rent per area.
    pub potential_annual_revenue: f64,
}

impl VacancyExposure {
    /// Properties are counted by code; records without a code are not
    /// counted as properties but still contribute space and rent.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaseRecord>,
    {
        let mut properties = BTreeSet::new();
        let mut vacant_properties = BTreeSet::new();
        let mut vacant_spaces = 0;
        let mut vacant_sf = 0.0;
        let mut rent_psf_sum = 0.0;
        let mut rent_psf_count = 0usize;

        for record in records.into_iter().filter(|record| record.has_valid_area()) {
            let code = record.property_code.as_deref();
            properties.extend(code);
            if record.is_vacant {
                vacant_properties.extend(code);
                vacant_spaces += 1;
                vacant_sf += record.area;
            } else if let Some(rent_psf) = record.annual_rent_per_area.filter(|v| v.is_finite()) {
                rent_psf_sum += rent_psf;
                rent_psf_count += 1;
            }
        }

        let avg_occupied_rent_psf = ratio(rent_psf_sum, rent_psf_count as f64);
        Self {
            properties_with_vacancy: vacant_properties.len(),
            total_properties: properties.len(),
            vacant_spaces,
            vacant_sf,
            avg_occupied_rent_psf,
            potential_annual_revenue: vacant_sf * avg_occupied_rent_psf,
        }
    }
}
