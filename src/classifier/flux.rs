use crate::constants::{
    FLARE_CLASS_A, FLARE_CLASS_B, FLARE_CLASS_C, FLARE_CLASS_M, FLARE_CLASS_X, G_SCALE_LADDER,
    R_SCALE_LADDER, S_SCALE_LADDER,
};
use crate::models::{FlareClass, GScale, RScale, SScale, SpaceWeatherReading};
use serde::{Deserialize, Serialize};

/// Flare class letter for a short-wave X-ray flux. A boundary value belongs to
/// the higher class.
pub fn flare_class(short_wave_flux: f64) -> FlareClass {
    if short_wave_flux >= FLARE_CLASS_X {
        FlareClass::X
    } else if short_wave_flux >= FLARE_CLASS_M {
        FlareClass::M
    } else if short_wave_flux >= FLARE_CLASS_C {
        FlareClass::C
    } else if short_wave_flux >= FLARE_CLASS_B {
        FlareClass::B
    } else {
        FlareClass::A
    }
}

/// Full designation with sub-level, e.g. `"M5.0"`. X is open-ended (`"X12.0"`).
pub fn flare_designation(short_wave_flux: f64) -> String {
    let class = flare_class(short_wave_flux);
    let base = match class {
        FlareClass::A => FLARE_CLASS_A,
        FlareClass::B => FLARE_CLASS_B,
        FlareClass::C => FLARE_CLASS_C,
        FlareClass::M => FLARE_CLASS_M,
        FlareClass::X => FLARE_CLASS_X,
    };

    let raw = if short_wave_flux.is_finite() {
        short_wave_flux / base
    } else {
        1.0
    };
    let level = match class {
        FlareClass::X => raw.max(1.0),
        _ => raw.clamp(1.0, 9.9),
    };

    format!("{}{:.1}", class, level)
}

/// Radio blackout level from long-wave flux.
pub fn r_scale(long_wave_flux: f64) -> RScale {
    RScale(ladder_level(long_wave_flux, &R_SCALE_LADDER))
}

/// Radiation storm level from >=10 MeV proton flux.
pub fn s_scale(flux_10mev: f64) -> SScale {
    SScale(ladder_level(flux_10mev, &S_SCALE_LADDER))
}

/// Geomagnetic storm level from Kp.
pub fn g_scale(kp: f64) -> GScale {
    GScale(ladder_level(kp, &G_SCALE_LADDER))
}

/// NOAA scale levels for one reading. A scale whose input is missing stays
/// `None` rather than reading as level 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoaaScales {
    pub radio_blackout: Option<RScale>,
    pub radiation_storm: Option<SScale>,
    pub geomagnetic_storm: Option<GScale>,
}

impl NoaaScales {
    pub fn from_reading(reading: &SpaceWeatherReading) -> Self {
        Self {
            radio_blackout: reading.long_wave_flux().map(r_scale),
            radiation_storm: reading.proton_flux_10mev().map(s_scale),
            geomagnetic_storm: reading.kp().map(g_scale),
        }
    }
}

fn ladder_level(value: f64, ladder: &[f64; 5]) -> u8 {
    ladder.iter().take_while(|&&bound| value >= bound).count() as u8
}
