use serde::{Deserialize, Serialize};

/// One scoring band: values past `threshold` earn `points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: f64,
    pub points: u8,
}

const fn tier(threshold: f64, points: u8) -> Tier {
    Tier { threshold, points }
}

/// Bands and level cut-offs for the composite risk score. Tiers are checked
/// in order and the first match wins, so list the harshest band first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Occupancy percent strictly below the threshold.
    pub occupancy: Vec<Tier>,
    /// WALT months strictly below the threshold.
    pub walt: Vec<Tier>,
    /// Near-term expiry percent strictly above the threshold.
    pub near_term_expiry: Vec<Tier>,
    /// Top-10 tenant share strictly above the threshold.
    pub concentration: Vec<Tier>,
    pub high_level_min: u8,
    pub medium_level_min: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            occupancy: vec![tier(85.0, 30), tier(90.0, 20), tier(95.0, 10)],
            walt: vec![tier(24.0, 30), tier(36.0, 20), tier(48.0, 10)],
            near_term_expiry: vec![tier(25.0, 20), tier(15.0, 10), tier(10.0, 5)],
            concentration: vec![tier(30.0, 20), tier(20.0, 10), tier(15.0, 5)],
            high_level_min: 60,
            medium_level_min: 30,
        }
    }
}
