//! CME / interplanetary shock heuristic.
//!
//! A shock front shows up as a velocity jump and a Bz swing arriving together.
//! Both deltas are computed here directly from the two readings; the rule does
//! not look at the change list.

use serde::{Deserialize, Serialize};

use crate::models::SpaceWeatherReading;

/// Empirical tuning values. Both comparisons are strict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShockThresholds {
    pub velocity_jump_kms: f64,
    pub bz_jump_nt: f64,
}

impl Default for ShockThresholds {
    fn default() -> Self {
        Self {
            velocity_jump_kms: 150.0,
            bz_jump_nt: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShockSignature {
    pub delta_velocity: f64,
    pub delta_bz: f64,
}

/// Fires when `|Δvelocity|` and `|Δbz|` both exceed their thresholds.
pub fn detect_shock(
    current: &SpaceWeatherReading,
    previous: Option<&SpaceWeatherReading>,
    thresholds: &ShockThresholds,
) -> Option<ShockSignature> {
    let previous = previous?;

    let delta_velocity = current.velocity()? - previous.velocity()?;
    let delta_bz = current.bz()? - previous.bz()?;

    (delta_velocity.abs() > thresholds.velocity_jump_kms && delta_bz.abs() > thresholds.bz_jump_nt)
        .then_some(ShockSignature {
            delta_velocity,
            delta_bz,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SolarWind;
    use chrono::Utc;

    fn reading(velocity: f64, bz: f64) -> SpaceWeatherReading {
        SpaceWeatherReading::empty(Utc::now()).with_solar_wind(SolarWind {
            velocity,
            density: 5.0,
            bz,
            bx: None,
            by: None,
            bt: None,
            temperature: 1.0e5,
        })
    }

    #[test]
    fn needs_both_jumps() {
        let t = ShockThresholds::default();
        let before = reading(400.0, 0.0);

        let shock = detect_shock(&reading(600.0, -8.0), Some(&before), &t).unwrap();
        assert_eq!(shock.delta_velocity, 200.0);
        assert_eq!(shock.delta_bz, -8.0);

        assert!(detect_shock(&reading(600.0, -2.0), Some(&before), &t).is_none());
        assert!(detect_shock(&reading(450.0, -8.0), Some(&before), &t).is_none());
    }

    #[test]
    fn thresholds_are_strict() {
        let t = ShockThresholds::default();
        let before = reading(400.0, 0.0);
        assert!(detect_shock(&reading(550.0, -5.0), Some(&before), &t).is_none());
        assert!(detect_shock(&reading(550.1, -5.1), Some(&before), &t).is_some());
    }

    #[test]
    fn decreases_count_too() {
        let t = ShockThresholds::default();
        let before = reading(700.0, -10.0);
        assert!(detect_shock(&reading(500.0, 0.0), Some(&before), &t).is_some());
    }

    #[test]
    fn no_previous_or_missing_wind_never_fires() {
        let t = ShockThresholds::default();
        assert!(detect_shock(&reading(900.0, -20.0), None, &t).is_none());

        let empty = SpaceWeatherReading::empty(Utc::now());
        assert!(detect_shock(&reading(900.0, -20.0), Some(&empty), &t).is_none());
    }
}
