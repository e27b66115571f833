use crate::domain::LeaseRecord;
use crate::metrics::snapshot::percent;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantExposure {
    pub tenant: String,
    pub area: f64,
    pub annual_rent: f64,
    pub share_pct: f64,
}

/// Occupied tenants ranked by summed annual rent, largest first. Rows with no
/// tenant name are left out of both the ranking and the revenue total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TenantConcentration {
    pub total_revenue: f64,
    pub tenants: Vec<TenantExposure>,
}

impl TenantConcentration {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaseRecord>,
    {
        let mut grouped: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for record in records
            .into_iter()
            .filter(|record| record.has_valid_area() && record.is_occupied())
        {
            let Some(tenant) = record.tenant_name.as_deref() else {
                continue;
            };
            let entry = grouped.entry(tenant).or_insert((0.0, 0.0));
            entry.0 += record.area;
            entry.1 += record.annual_rent_or_zero();
        }

        let total_revenue: f64 = grouped.values().map(|(_, rent)| rent).sum();
        let mut tenants: Vec<TenantExposure> = grouped
            .into_iter()
            .map(|(tenant, (area, annual_rent))| TenantExposure {
                tenant: tenant.to_string(),
                area,
                annual_rent,
                share_pct: percent(annual_rent, total_revenue),
            })
            .collect();

        // Ties keep the alphabetical order from the map.
        tenants.sort_by(|a, b| {
            b.annual_rent
                .partial_cmp(&a.annual_rent)
                .unwrap_or(Ordering::Equal)
        });

        Self {
            total_revenue,
            tenants,
        }
    }

    /// Share of revenue held by the largest `n` tenants, in percent.
    pub fn top_share(&self, n: usize) -> f64 {
        let top: f64 = self.tenants.iter().take(n).map(|t| t.annual_rent).sum();
        percent(top, self.total_revenue)
    }

    pub fn unique_tenants(&self) -> usize {
        self.tenants.len()
    }
}
