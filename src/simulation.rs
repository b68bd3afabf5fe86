//! Synthetic reading feed.
//!
//! Stands in for the upstream fetch layer when running the driver. Each
//! parameter is a leaky random walk around a quiet baseline, with an occasional
//! shock that jumps wind speed and turns the field south.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{ProtonFlux, SolarWind, SpaceWeatherReading, XrayFlux};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Chance per reading that a shock front arrives.
const SHOCK_PROBABILITY: f64 = 0.02;
/// Fraction of the distance back to baseline recovered per reading.
const LEAK: f64 = 0.03;

struct Walk {
    value: f64,
    baseline: f64,
    step: f64,
    min: f64,
    max: f64,
}

impl Walk {
    fn new(baseline: f64, step: f64, min: f64, max: f64) -> Self {
        Self {
            value: baseline,
            baseline,
            step,
            min,
            max,
        }
    }

    fn advance(&mut self, rng: &mut StdRng) -> f64 {
        let white: f64 = rng.gen_range(-1.0..1.0);
        self.value += white * self.step;
        self.value += (self.baseline - self.value) * LEAK;
        self.value = self.value.clamp(self.min, self.max);
        self.value
    }

    fn kick(&mut self, amount: f64) {
        self.value = (self.value + amount).clamp(self.min, self.max);
    }
}

pub struct SyntheticFeed {
    rng: StdRng,
    velocity: Walk,
    density: Walk,
    bz: Walk,
    temperature: Walk,
    kp: Walk,
    /// log10 of the short-wave X-ray flux.
    xray_log: Walk,
    /// log10 of the >=10 MeV proton flux.
    proton_log: Walk,
}

impl SyntheticFeed {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible feed for tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            velocity: Walk::new(400.0, 15.0, 250.0, 1200.0),
            density: Walk::new(5.0, 0.8, 0.5, 60.0),
            bz: Walk::new(0.0, 1.2, -40.0, 40.0),
            temperature: Walk::new(1.0e5, 8.0e3, 1.0e4, 1.0e6),
            kp: Walk::new(2.0, 0.25, 0.0, 9.0),
            xray_log: Walk::new(-6.5, 0.1, -8.5, -3.0),
            proton_log: Walk::new(0.0, 0.1, -1.0, 5.0),
        }
    }

    pub fn next_reading(&mut self, timestamp: DateTime<Utc>) -> SpaceWeatherReading {
        if self.rng.gen_bool(SHOCK_PROBABILITY) {
            let jump = self.rng.gen_range(180.0..450.0);
            let turn = self.rng.gen_range(6.0..18.0);
            log_debug!("synthetic shock: +{:.0} km/s, bz -{:.1} nT", jump, turn);
            self.velocity.kick(jump);
            self.bz.kick(-turn);
            self.density.kick(self.rng.gen_range(5.0..20.0));
            self.kp.kick(self.rng.gen_range(1.0..3.0));
            self.xray_log.kick(self.rng.gen_range(0.5..2.0));
        }

        let rng = &mut self.rng;
        let solar_wind = SolarWind {
            velocity: self.velocity.advance(rng),
            density: self.density.advance(rng),
            bz: self.bz.advance(rng),
            bx: None,
            by: None,
            bt: None,
            temperature: self.temperature.advance(rng),
        };
        let kp = (self.kp.advance(rng) * 3.0).round() / 3.0;
        let short_wave = 10f64.powf(self.xray_log.advance(rng));
        let flux_10mev = 10f64.powf(self.proton_log.advance(rng));

        SpaceWeatherReading::empty(timestamp)
            .with_solar_wind(solar_wind)
            .with_kp(kp)
            .with_xray(XrayFlux {
                short_wave: Some(short_wave),
                long_wave: Some(short_wave * 3.0),
                flare_class: None,
            })
            .with_proton_flux(ProtonFlux {
                flux_10mev,
                flux_50mev: flux_10mev * 0.1,
                flux_100mev: flux_10mev * 0.02,
            })
    }
}

impl Default for SyntheticFeed {
    fn default() -> Self {
        Self::new()
    }
}
