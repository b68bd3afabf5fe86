//! Condition classifier.
//!
//! Pure, total functions mapping raw readings to discrete conditions, NOAA
//! scales, derived plasma quantities and the pitch/decay/detune parameters the
//! chord mapper builds on.

pub mod condition;
pub mod derived;
pub mod flux;
pub mod mapping;

pub use condition::{classify, classify_values};
pub use derived::{
    alfven_speed, dynamic_pressure, magnetopause_standoff, plasma_beta, DerivedQuantities,
};
pub use flux::{flare_class, flare_designation, g_scale, r_scale, s_scale, NoaaScales};
pub use mapping::{bz_to_detune, density_to_decay, midi_to_frequency, velocity_to_midi};
