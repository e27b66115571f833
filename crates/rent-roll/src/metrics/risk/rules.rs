use super::config::{RiskThresholds, Tier};
use super::{RiskComponent, RiskFactor};

pub(crate) struct RiskSignals {
    pub occupancy_rate: f64,
    pub walt: f64,
    pub near_term_expiry_pct: f64,
    pub top10_concentration: f64,
}

pub(crate) fn score_signals(
    signals: &RiskSignals,
    thresholds: &RiskThresholds,
) -> (Vec<RiskComponent>, u8) {
    let components = vec![
        component(
            RiskFactor::Occupancy,
            signals.occupancy_rate,
            below(signals.occupancy_rate, &thresholds.occupancy),
            &thresholds.occupancy,
        ),
        component(
            RiskFactor::LeaseTerm,
            signals.walt,
            below(signals.walt, &thresholds.walt),
            &thresholds.walt,
        ),
        component(
            RiskFactor::NearTermExpiry,
            signals.near_term_expiry_pct,
            above(signals.near_term_expiry_pct, &thresholds.near_term_expiry),
            &thresholds.near_term_expiry,
        ),
        component(
            RiskFactor::Concentration,
            signals.top10_concentration,
            above(signals.top10_concentration, &thresholds.concentration),
            &thresholds.concentration,
        ),
    ];

    let total: u32 = components.iter().map(|c| u32::from(c.score)).sum();
    (components, total.min(100) as u8)
}

fn component(factor: RiskFactor, value: f64, score: u8, tiers: &[Tier]) -> RiskComponent {
    RiskComponent {
        factor,
        value,
        score,
        max_score: max_points(tiers),
    }
}

fn below(value: f64, tiers: &[Tier]) -> u8 {
    tiers
        .iter()
        .find(|tier| value < tier.threshold)
        .map_or(0, |tier| tier.points)
}

fn above(value: f64, tiers: &[Tier]) -> u8 {
    tiers
        .iter()
        .find(|tier| value > tier.threshold)
        .map_or(0, |tier| tier.points)
}

fn max_points(tiers: &[Tier]) -> u8 {
    tiers.iter().map(|tier| tier.points).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(occupancy: f64, walt: f64, near_term: f64, top10: f64) -> RiskSignals {
        RiskSignals {
            occupancy_rate: occupancy,
            walt,
            near_term_expiry_pct: near_term,
            top10_concentration: top10,
        }
    }

    fn factor_score(components: &[RiskComponent], factor: RiskFactor) -> u8 {
        components
            .iter()
            .find(|c| c.factor == factor)
            .map(|c| c.score)
            .expect("factor scored")
    }

    #[test]
    fn occupancy_threshold_is_strict() {
        let thresholds = RiskThresholds::default();
        let (low, _) = score_signals(&signals(84.0, 60.0, 0.0, 0.0), &thresholds);
        let (edge, _) = score_signals(&signals(85.0, 60.0, 0.0, 0.0), &thresholds);
        let (healthy, _) = score_signals(&signals(95.0, 60.0, 0.0, 0.0), &thresholds);
        assert_eq!(factor_score(&low, RiskFactor::Occupancy), 30);
        assert_eq!(factor_score(&edge, RiskFactor::Occupancy), 20);
        assert_eq!(factor_score(&healthy, RiskFactor::Occupancy), 0);
    }

    #[test]
    fn walt_bands() {
        let thresholds = RiskThresholds::default();
        for (walt, expected) in [(23.9, 30), (24.0, 20), (36.0, 10), (48.0, 0)] {
            let (components, _) = score_signals(&signals(100.0, walt, 0.0, 0.0), &thresholds);
            assert_eq!(factor_score(&components, RiskFactor::LeaseTerm), expected, "walt {walt}");
        }
    }

    #[test]
    fn exposure_bands_are_strictly_above() {
        let thresholds = RiskThresholds::default();
        for (pct, expected) in [(25.0, 10), (25.1, 20), (15.0, 5), (10.0, 0)] {
            let (components, _) = score_signals(&signals(100.0, 60.0, pct, pct), &thresholds);
            assert_eq!(factor_score(&components, RiskFactor::NearTermExpiry), expected);
        }
        for (pct, expected) in [(30.0, 10), (30.5, 20), (20.0, 5), (15.0, 0)] {
            let (components, _) = score_signals(&signals(100.0, 60.0, 0.0, pct), &thresholds);
            assert_eq!(factor_score(&components, RiskFactor::Concentration), expected);
        }
    }

    #[test]
    fn worst_case_hits_the_cap() {
        let (components, total) =
            score_signals(&signals(10.0, 1.0, 90.0, 90.0), &RiskThresholds::default());
        assert_eq!(total, 100);
        let maxima: Vec<u8> = components.iter().map(|c| c.max_score).collect();
        assert_eq!(maxima, vec![30, 30, 20, 20]);
    }

    #[test]
    fn nan_signals_score_zero() {
        let (_, total) = score_signals(
            &signals(f64::NAN, f64::NAN, f64::NAN, f64::NAN),
            &RiskThresholds::default(),
        );
        assert_eq!(total, 0);
    }
}
