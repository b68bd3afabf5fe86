//! Derived plasma quantities.
//!
//! Physically invalid inputs never produce NaN or infinity: the divide-by-zero
//! cases return a 0 sentinel, the standoff distance falls back to its base value.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ALFVEN_SPEED_COEFF, DYNAMIC_PRESSURE_COEFF, MAGNETOPAUSE_BASE_RE, MAGNETOPAUSE_BZ_COEFF,
    MAGNETOPAUSE_PRESSURE_EXPONENT, PLASMA_BETA_COEFF,
};
use crate::models::SpaceWeatherReading;

/// Solar wind ram pressure in nPa.
pub fn dynamic_pressure(density: f64, velocity: f64) -> f64 {
    sanitize(DYNAMIC_PRESSURE_COEFF * density * velocity * velocity)
}

/// Alfvén speed in km/s.
pub fn alfven_speed(bt: f64, density: f64) -> f64 {
    if !(density > 0.0) {
        return 0.0;
    }
    sanitize(ALFVEN_SPEED_COEFF * bt / density.sqrt())
}

/// Ratio of thermal to magnetic pressure.
pub fn plasma_beta(density: f64, temperature: f64, bt: f64) -> f64 {
    if !(bt > 0.0) {
        return 0.0;
    }
    sanitize(PLASMA_BETA_COEFF * density * temperature / (bt * bt))
}

/// Subsolar magnetopause distance in Earth radii (Shue et al. 1997 form).
pub fn magnetopause_standoff(pdyn: f64, bz: f64) -> f64 {
    if !(pdyn > 0.0) {
        return MAGNETOPAUSE_BASE_RE;
    }

    let standoff = MAGNETOPAUSE_BASE_RE
        * pdyn.powf(MAGNETOPAUSE_PRESSURE_EXPONENT)
        * (1.0 + MAGNETOPAUSE_BZ_COEFF * bz);

    if standoff.is_finite() {
        standoff
    } else {
        MAGNETOPAUSE_BASE_RE
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// All four derived quantities for one reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedQuantities {
    pub dynamic_pressure_npa: f64,
    pub alfven_speed_kms: f64,
    pub plasma_beta: f64,
    pub magnetopause_standoff_re: f64,
}

impl DerivedQuantities {
    /// Without solar wind every value is its sentinel.
    pub fn from_reading(reading: &SpaceWeatherReading) -> Self {
        let density = reading.density().unwrap_or(0.0);
        let velocity = reading.velocity().unwrap_or(0.0);
        let bt = reading.bt().unwrap_or(0.0);
        let temperature = reading.temperature().unwrap_or(0.0);
        let bz = reading.bz().unwrap_or(0.0);

        let pdyn = dynamic_pressure(density, velocity);

        Self {
            dynamic_pressure_npa: pdyn,
            alfven_speed_kms: alfven_speed(bt, density),
            plasma_beta: plasma_beta(density, temperature, bt),
            magnetopause_standoff_re: magnetopause_standoff(pdyn, bz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SolarWind;
    use chrono::Utc;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn dynamic_pressure_matches_formula() {
        // 5 p/cm^3 at 400 km/s is the textbook ~1.34 nPa.
        assert!(close(dynamic_pressure(5.0, 400.0), 1.6726e-6 * 5.0 * 160_000.0));
        assert_eq!(dynamic_pressure(0.0, 400.0), 0.0);
    }

    #[test]
    fn alfven_speed_guards_density() {
        assert!(close(alfven_speed(5.0, 4.0), 21.8 * 5.0 / 2.0));
        assert_eq!(alfven_speed(5.0, 0.0), 0.0);
        assert_eq!(alfven_speed(5.0, -1.0), 0.0);
        assert_eq!(alfven_speed(5.0, f64::NAN), 0.0);
    }

    #[test]
    fn plasma_beta_guards_field() {
        assert!(close(plasma_beta(5.0, 1.0e5, 5.0), 4.03e-6 * 5.0 * 1.0e5 / 25.0));
        assert_eq!(plasma_beta(5.0, 1.0e5, 0.0), 0.0);
        assert_eq!(plasma_beta(5.0, 1.0e5, -2.0), 0.0);
    }

    #[test]
    fn standoff_shrinks_with_pressure_and_southward_bz() {
        assert_eq!(magnetopause_standoff(0.0, -10.0), 10.22);
        assert!(close(magnetopause_standoff(1.0, 0.0), 10.22));

        let calm = magnetopause_standoff(1.0, 0.0);
        let compressed = magnetopause_standoff(10.0, 0.0);
        let eroded = magnetopause_standoff(1.0, -10.0);
        assert!(compressed < calm);
        assert!(eroded < calm);
        assert!(close(eroded, 10.22 * (1.0 - 0.33)));
    }

    #[test]
    fn bundle_without_solar_wind_is_all_sentinels() {
        let q = DerivedQuantities::from_reading(&SpaceWeatherReading::empty(Utc::now()));
        assert_eq!(q.dynamic_pressure_npa, 0.0);
        assert_eq!(q.alfven_speed_kms, 0.0);
        assert_eq!(q.plasma_beta, 0.0);
        assert_eq!(q.magnetopause_standoff_re, 10.22);
    }

    #[test]
    fn bundle_uses_component_magnitude_when_bt_missing() {
        let reading = SpaceWeatherReading::empty(Utc::now()).with_solar_wind(SolarWind {
            velocity: 400.0,
            density: 4.0,
            bz: -4.0,
            bx: Some(3.0),
            by: None,
            bt: None,
            temperature: 1.0e5,
        });
        let q = DerivedQuantities::from_reading(&reading);
        assert!(close(q.alfven_speed_kms, 21.8 * 5.0 / 2.0));
    }
}
