//! Reading snapshot data model.
//!
//! One immutable, timestamped snapshot of every feed the fetch layer managed to
//! normalize. Any sub-record can be missing when its instrument is out, and a
//! missing record means "no signal", never zero. The accessors below also treat
//! non-finite values as missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FlareClass;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SolarWind {
    /// km/s
    pub velocity: f64,
    /// protons/cm^3
    pub density: f64,
    /// nT, GSM
    pub bz: f64,
    #[serde(default)]
    pub bx: Option<f64>,
    #[serde(default)]
    pub by: Option<f64>,
    #[serde(default)]
    pub bt: Option<f64>,
    /// K
    pub temperature: f64,
}

impl SolarWind {
    /// Total IMF magnitude: the reported `bt`, or the magnitude of whatever
    /// components are present.
    pub fn total_field(&self) -> f64 {
        if let Some(bt) = self.bt.and_then(finite) {
            return bt;
        }

        let bx = self.bx.and_then(finite).unwrap_or(0.0);
        let by = self.by.and_then(finite).unwrap_or(0.0);
        let bz = finite(self.bz).unwrap_or(0.0);
        (bx * bx + by * by + bz * bz).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct KIndex {
    pub kp: f64,
    #[serde(default)]
    pub a_running: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct XrayFlux {
    /// 0.05-0.4 nm, W/m^2
    #[serde(default)]
    pub short_wave: Option<f64>,
    /// 0.1-0.8 nm, W/m^2
    #[serde(default)]
    pub long_wave: Option<f64>,
    /// Designation as reported upstream, e.g. "M2.4".
    #[serde(default)]
    pub flare_class: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProtonFlux {
    pub flux_10mev: f64,
    pub flux_50mev: f64,
    pub flux_100mev: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ElectronFlux {
    pub flux_2mev: f64,
    pub flux_0_8mev: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Magnetometer {
    pub h_component: f64,
    pub d_component: f64,
    pub z_component: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpaceWeatherReading {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub solar_wind: Option<SolarWind>,
    #[serde(default)]
    pub k_index: Option<KIndex>,
    #[serde(default)]
    pub xray_flux: Option<XrayFlux>,
    #[serde(default)]
    pub proton_flux: Option<ProtonFlux>,
    #[serde(default)]
    pub electron_flux: Option<ElectronFlux>,
    #[serde(default)]
    pub magnetometer: Option<Magnetometer>,
}

impl SpaceWeatherReading {
    /// A reading with every instrument missing.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            solar_wind: None,
            k_index: None,
            xray_flux: None,
            proton_flux: None,
            electron_flux: None,
            magnetometer: None,
        }
    }

    pub fn with_solar_wind(mut self, solar_wind: SolarWind) -> Self {
        self.solar_wind = Some(solar_wind);
        self
    }

    pub fn with_kp(mut self, kp: f64) -> Self {
        self.k_index = Some(KIndex {
            kp,
            a_running: None,
        });
        self
    }

    pub fn with_xray(mut self, xray: XrayFlux) -> Self {
        self.xray_flux = Some(xray);
        self
    }

    pub fn with_proton_flux(mut self, flux: ProtonFlux) -> Self {
        self.proton_flux = Some(flux);
        self
    }

    pub fn velocity(&self) -> Option<f64> {
        self.solar_wind.and_then(|sw| finite(sw.velocity))
    }

    pub fn density(&self) -> Option<f64> {
        self.solar_wind.and_then(|sw| finite(sw.density))
    }

    pub fn bz(&self) -> Option<f64> {
        self.solar_wind.and_then(|sw| finite(sw.bz))
    }

    pub fn bt(&self) -> Option<f64> {
        self.solar_wind.map(|sw| sw.total_field())
    }

    pub fn temperature(&self) -> Option<f64> {
        self.solar_wind.and_then(|sw| finite(sw.temperature))
    }

    pub fn kp(&self) -> Option<f64> {
        self.k_index.and_then(|k| finite(k.kp))
    }

    pub fn short_wave_flux(&self) -> Option<f64> {
        self.xray_flux
            .as_ref()
            .and_then(|x| x.short_wave)
            .and_then(finite)
    }

    pub fn long_wave_flux(&self) -> Option<f64> {
        self.xray_flux
            .as_ref()
            .and_then(|x| x.long_wave)
            .and_then(finite)
    }

    pub fn proton_flux_10mev(&self) -> Option<f64> {
        self.proton_flux.and_then(|p| finite(p.flux_10mev))
    }

    /// Flare letter from the short-wave flux when measured, otherwise from the
    /// upstream designation.
    pub fn flare_letter(&self) -> Option<FlareClass> {
        if let Some(flux) = self.short_wave_flux() {
            return Some(crate::classifier::flare_class(flux));
        }

        self.xray_flux
            .as_ref()
            .and_then(|x| x.flare_class.as_deref())
            .and_then(FlareClass::parse)
    }
}

pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wind(velocity: f64, density: f64, bz: f64) -> SolarWind {
        SolarWind {
            velocity,
            density,
            bz,
            bx: None,
            by: None,
            bt: None,
            temperature: 1.0e5,
        }
    }

    #[test]
    fn missing_records_read_as_no_signal() {
        let reading = SpaceWeatherReading::empty(Utc::now());
        assert_eq!(reading.velocity(), None);
        assert_eq!(reading.kp(), None);
        assert_eq!(reading.flare_letter(), None);
        assert_eq!(reading.bt(), None);
    }

    #[test]
    fn non_finite_values_read_as_missing() {
        let reading = SpaceWeatherReading::empty(Utc::now())
            .with_solar_wind(wind(f64::NAN, 4.0, f64::NEG_INFINITY))
            .with_kp(f64::NAN);
        assert_eq!(reading.velocity(), None);
        assert_eq!(reading.density(), Some(4.0));
        assert_eq!(reading.bz(), None);
        assert_eq!(reading.kp(), None);
    }

    #[test]
    fn total_field_prefers_reported_bt() {
        let mut sw = wind(400.0, 5.0, -3.0);
        sw.bx = Some(4.0);
        assert!((sw.total_field() - 5.0).abs() < 1e-12);

        sw.bt = Some(7.5);
        assert_eq!(sw.total_field(), 7.5);
    }

    #[test]
    fn flare_letter_prefers_measured_flux() {
        let reading = SpaceWeatherReading::empty(Utc::now()).with_xray(XrayFlux {
            short_wave: Some(2.0e-5),
            long_wave: None,
            flare_class: Some("C1.0".into()),
        });
        assert_eq!(reading.flare_letter(), Some(FlareClass::M));

        let reported_only = SpaceWeatherReading::empty(Utc::now()).with_xray(XrayFlux {
            short_wave: None,
            long_wave: None,
            flare_class: Some("X1.2".into()),
        });
        assert_eq!(reported_only.flare_letter(), Some(FlareClass::X));
    }

    #[test]
    fn deserializes_partial_snapshot() {
        let json = r#"{
            "timestamp": "2026-10-16T12:00:00Z",
            "solar_wind": {"velocity": 520.5, "density": 7.1, "bz": -6.2, "temperature": 150000.0},
            "k_index": {"kp": 4.33}
        }"#;
        let reading: SpaceWeatherReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.velocity(), Some(520.5));
        assert_eq!(reading.kp(), Some(4.33));
        assert!(reading.xray_flux.is_none());
        assert!(reading.magnetometer.is_none());
    }
}
