//! Chord / harmony mapper.
//!
//! Turns a reading into the parameter bundle the audio engine plays: a root
//! note from solar wind speed, a decay from density, a detune from southward
//! Bz, a harmonic set chosen by the classified condition and a vowel formant
//! from proton temperature. Oscillator wiring happens elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::{
    bz_to_detune, classify, density_to_decay, midi_to_frequency, velocity_to_midi,
};
use crate::constants::{
    BASELINE_BZ, BASELINE_DENSITY, BASELINE_TEMPERATURE, BASELINE_VELOCITY,
    VOWEL_TEMPERATURE_LADDER,
};
use crate::models::{Condition, SpaceWeatherReading};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Vowel formant target, darkest to brightest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vowel {
    U,
    O,
    A,
    E,
    I,
}

impl fmt::Display for Vowel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Vowel::U => "u",
            Vowel::O => "o",
            Vowel::A => "a",
            Vowel::E => "e",
            Vowel::I => "i",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioSnapshot {
    /// False when the solar wind record was missing and the quiet baseline was used.
    pub has_signal: bool,
    pub condition: Condition,
    pub midi_note: u8,
    pub note_name: String,
    pub frequency_hz: f64,
    pub decay_secs: f64,
    pub detune_cents: i32,
    /// Root first.
    pub harmonics_hz: Vec<f64>,
    pub vowel: Vowel,
}

/// Build the audio parameter bundle for a reading.
pub fn map_chord(reading: &SpaceWeatherReading) -> AudioSnapshot {
    let has_signal = reading.solar_wind.is_some();
    let velocity = reading.velocity().unwrap_or(BASELINE_VELOCITY);
    let density = reading.density().unwrap_or(BASELINE_DENSITY);
    let bz = reading.bz().unwrap_or(BASELINE_BZ);
    let temperature = reading.temperature().unwrap_or(BASELINE_TEMPERATURE);

    let condition = classify(reading);
    let midi_note = velocity_to_midi(velocity);
    let frequency_hz = midi_to_frequency(midi_note);

    AudioSnapshot {
        has_signal,
        condition,
        midi_note,
        note_name: note_name(midi_note),
        frequency_hz,
        decay_secs: density_to_decay(density),
        detune_cents: bz_to_detune(bz),
        harmonics_hz: harmonic_ratios(condition)
            .iter()
            .map(|ratio| frequency_hz * ratio)
            .collect(),
        vowel: temperature_to_vowel(temperature),
    }
}

/// Frequency ratios above the root for each condition. Calm air gets a major
/// triad, the chord darkens and then loses its tonal center as activity rises.
pub fn harmonic_ratios(condition: Condition) -> &'static [f64] {
    match condition {
        Condition::Quiet => &[1.0, 1.25, 1.5],
        Condition::Moderate => &[1.0, 1.25, 1.5, 1.875],
        Condition::Storm => &[1.0, 1.2, 1.5],
        Condition::Extreme => &[1.0, 1.2, 1.4142, 1.6818],
        Condition::SuperExtreme => &[1.0, 1.0595, 1.4142, 1.8877],
    }
}

/// Scientific pitch name, middle C is `C4`.
pub fn note_name(midi: u8) -> String {
    let octave = (midi / 12) as i32 - 1;
    format!("{}{}", NOTE_NAMES[(midi % 12) as usize], octave)
}

pub fn temperature_to_vowel(temperature: f64) -> Vowel {
    const VOWELS: [Vowel; 5] = [Vowel::U, Vowel::O, Vowel::A, Vowel::E, Vowel::I];

    let idx = VOWEL_TEMPERATURE_LADDER
        .iter()
        .take_while(|&&bound| temperature >= bound)
        .count();
    VOWELS[idx]
}
