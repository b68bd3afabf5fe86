use crate::constants::{
    EXTREME_THRESHOLDS, MODERATE_THRESHOLDS, STORM_THRESHOLDS, SUPER_EXTREME_THRESHOLDS,
};
use crate::models::{Condition, SpaceWeatherReading};

/// Tier thresholds, most severe first.
const TIERS: [(Condition, (f64, f64, f64)); 4] = [
    (Condition::SuperExtreme, SUPER_EXTREME_THRESHOLDS),
    (Condition::Extreme, EXTREME_THRESHOLDS),
    (Condition::Storm, STORM_THRESHOLDS),
    (Condition::Moderate, MODERATE_THRESHOLDS),
];

/// Classify a reading. Missing kp, velocity or bz count as 0 here only.
pub fn classify(reading: &SpaceWeatherReading) -> Condition {
    classify_values(
        reading.kp().unwrap_or(0.0),
        reading.velocity().unwrap_or(0.0),
        reading.bz().unwrap_or(0.0),
    )
}

/// Worst case wins: each parameter is rated on its own and the most severe
/// rating is returned.
pub fn classify_values(kp: f64, velocity: f64, bz: f64) -> Condition {
    let kp_tier = rate(|(kp_min, _, _)| kp >= kp_min);
    let velocity_tier = rate(|(_, velocity_min, _)| velocity >= velocity_min);
    let bz_tier = rate(|(_, _, bz_max)| bz <= bz_max);

    kp_tier.max(velocity_tier).max(bz_tier)
}

fn rate(passes: impl Fn((f64, f64, f64)) -> bool) -> Condition {
    TIERS
        .iter()
        .find(|(_, thresholds)| passes(*thresholds))
        .map(|(condition, _)| *condition)
        .unwrap_or(Condition::Quiet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SolarWind;
    use chrono::Utc;

    fn reading(kp: f64, velocity: f64, bz: f64) -> SpaceWeatherReading {
        SpaceWeatherReading::empty(Utc::now())
            .with_solar_wind(SolarWind {
                velocity,
                density: 5.0,
                bz,
                bx: None,
                by: None,
                bt: None,
                temperature: 1.0e5,
            })
            .with_kp(kp)
    }

    #[test]
    fn all_missing_is_quiet() {
        assert_eq!(
            classify(&SpaceWeatherReading::empty(Utc::now())),
            Condition::Quiet
        );
    }

    #[test]
    fn worst_parameter_wins() {
        assert_eq!(classify_values(2.0, 700.0, 0.0), Condition::Extreme);
        assert_eq!(classify(&reading(6.0, 750.0, -9.0)), Condition::SuperExtreme);
        assert_eq!(classify(&reading(6.0, 700.0, -9.0)), Condition::Extreme);
        assert_eq!(classify_values(0.0, 300.0, -18.0), Condition::SuperExtreme);
    }

    #[test]
    fn velocity_at_749_is_one_tier_below_super_extreme() {
        // 750 km/s alone is super_extreme; with the velocity at 749 it drops to extreme.
        assert_eq!(classify_values(6.0, 749.0, -9.0), Condition::Extreme);
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(classify_values(3.0, 0.0, 0.0), Condition::Moderate);
        assert_eq!(classify_values(0.0, 450.0, 0.0), Condition::Moderate);
        assert_eq!(classify_values(0.0, 0.0, -4.0), Condition::Moderate);
        assert_eq!(classify_values(5.0, 0.0, 0.0), Condition::Storm);
        assert_eq!(classify_values(0.0, 560.0, 0.0), Condition::Storm);
        assert_eq!(classify_values(0.0, 0.0, -8.0), Condition::Storm);
        assert_eq!(classify_values(7.0, 0.0, 0.0), Condition::Extreme);
        assert_eq!(classify_values(8.0, 0.0, 0.0), Condition::SuperExtreme);
        assert_eq!(classify_values(2.99, 449.9, -3.99), Condition::Quiet);
    }

    #[test]
    fn nan_inputs_do_not_escalate() {
        assert_eq!(
            classify_values(f64::NAN, f64::NAN, f64::NAN),
            Condition::Quiet
        );
        assert_eq!(classify(&reading(f64::NAN, 600.0, 0.0)), Condition::Storm);
    }

    #[test]
    fn classification_is_deterministic() {
        let r = reading(4.0, 480.0, -7.0);
        let first = classify(&r);
        for _ in 0..100 {
            assert_eq!(classify(&r), first);
        }
    }
}
