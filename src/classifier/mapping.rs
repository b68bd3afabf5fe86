//! Pitch and timbre mapping.
//!
//! Inputs are clamped into their documented ranges before interpolating, so
//! every output stays inside its own range whatever the reading says.

use crate::constants::{
    A4_FREQUENCY_HZ, A4_MIDI, DECAY_RANGE_SECS, DENSITY_RANGE, DETUNE_BZ_THRESHOLD, MAX_DETUNE_CENTS,
    MIDI_RANGE, VELOCITY_RANGE,
};

/// Linear map of solar wind speed onto a MIDI note, rounded to the nearest semitone.
pub fn velocity_to_midi(velocity: f64) -> u8 {
    let (v_min, v_max) = VELOCITY_RANGE;
    let (m_min, m_max) = MIDI_RANGE;

    let v = clamp_finite(velocity, v_min, v_max);
    let t = (v - v_min) / (v_max - v_min);
    (m_min + t * (m_max - m_min)).round() as u8
}

/// Equal-tempered frequency of a MIDI note.
pub fn midi_to_frequency(midi: u8) -> f64 {
    A4_FREQUENCY_HZ * 2f64.powf((midi as f64 - A4_MIDI) / 12.0)
}

/// Logarithmic map of density onto decay time. Denser plasma rings shorter.
pub fn density_to_decay(density: f64) -> f64 {
    let (d_min, d_max) = DENSITY_RANGE;
    let (decay_sparse, decay_dense) = DECAY_RANGE_SECS;

    let d = clamp_finite(density, d_min, d_max);
    let t = (d.ln() - d_min.ln()) / (d_max.ln() - d_min.ln());
    decay_sparse + t * (decay_dense - decay_sparse)
}

/// Detune in cents. Zero until Bz drops below the threshold, then grows toward
/// the maximum and saturates.
pub fn bz_to_detune(bz: f64) -> i32 {
    if !bz.is_finite() || bz >= DETUNE_BZ_THRESHOLD {
        return 0;
    }

    let depth = ((bz - DETUNE_BZ_THRESHOLD).abs() / (2.0 * DETUNE_BZ_THRESHOLD).abs()).min(1.0);
    (MAX_DETUNE_CENTS * depth).round() as i32
}

fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_maps_linearly_and_clamps() {
        assert_eq!(velocity_to_midi(200.0), 36);
        assert_eq!(velocity_to_midi(800.0), 84);
        assert_eq!(velocity_to_midi(500.0), 60);
        assert_eq!(velocity_to_midi(50.0), 36);
        assert_eq!(velocity_to_midi(2_000.0), 84);
        assert_eq!(velocity_to_midi(f64::NAN), 36);
        assert_eq!(velocity_to_midi(f64::INFINITY), 84);
    }

    #[test]
    fn a4_is_440() {
        assert!((midi_to_frequency(69) - 440.0).abs() < 1e-9);
        assert!((midi_to_frequency(81) - 880.0).abs() < 1e-9);
        assert!((midi_to_frequency(60) - 261.6255653).abs() < 1e-6);
    }

    #[test]
    fn decay_is_logarithmic_and_decreasing() {
        let d1 = density_to_decay(1.0);
        let d10 = density_to_decay(10.0);
        let d40 = density_to_decay(40.0);
        assert!(d1 > d10 && d10 > d40);
        for d in [d1, d10, d40] {
            assert!((0.2..=5.0).contains(&d));
        }

        // Equal ratios of density give equal steps of decay.
        let step_a = density_to_decay(0.5) - density_to_decay(5.0);
        let step_b = density_to_decay(5.0) - density_to_decay(50.0);
        assert!((step_a - step_b).abs() < 1e-9);
    }

    #[test]
    fn decay_clamps_at_both_ends() {
        assert!((density_to_decay(0.5) - 5.0).abs() < 1e-12);
        assert!((density_to_decay(0.0) - 5.0).abs() < 1e-12);
        assert!((density_to_decay(-3.0) - 5.0).abs() < 1e-12);
        assert!((density_to_decay(50.0) - 0.2).abs() < 1e-12);
        assert!((density_to_decay(500.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn detune_only_below_threshold() {
        assert_eq!(bz_to_detune(5.0), 0);
        assert_eq!(bz_to_detune(-5.0), 0);
        assert_eq!(bz_to_detune(-10.0), -10);
        assert_eq!(bz_to_detune(-15.0), -20);
        assert_eq!(bz_to_detune(-40.0), -20);
        assert_eq!(bz_to_detune(f64::NAN), 0);
    }
}
