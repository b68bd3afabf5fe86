//! Physical constant table.
//!
//! Calibration constants, range tables and flux ladders used by the classifier
//! and the chord mapper. Everything here is a plain lookup value.

// Condition thresholds. Each tier is reached if any one of its three checks passes.

/// `(kp >=, velocity >=, bz <=)` per tier, most severe first.
pub const SUPER_EXTREME_THRESHOLDS: (f64, f64, f64) = (8.0, 750.0, -18.0);
pub const EXTREME_THRESHOLDS: (f64, f64, f64) = (7.0, 650.0, -12.0);
pub const STORM_THRESHOLDS: (f64, f64, f64) = (5.0, 560.0, -8.0);
pub const MODERATE_THRESHOLDS: (f64, f64, f64) = (3.0, 450.0, -4.0);

// Derived quantities

/// Proton mass times the unit conversion to nPa for n [cm^-3] and v [km/s].
pub const DYNAMIC_PRESSURE_COEFF: f64 = 1.6726e-6;
/// Alfvén speed in km/s for B [nT] and n [cm^-3].
pub const ALFVEN_SPEED_COEFF: f64 = 21.8;
/// Plasma beta for n [cm^-3], T [K] and B [nT].
pub const PLASMA_BETA_COEFF: f64 = 4.03e-6;
/// Shue et al. subsolar standoff distance in Earth radii at 1 nPa.
pub const MAGNETOPAUSE_BASE_RE: f64 = 10.22;
pub const MAGNETOPAUSE_BZ_COEFF: f64 = 0.033;
pub const MAGNETOPAUSE_PRESSURE_EXPONENT: f64 = -1.0 / 6.0;

// GOES X-ray flux ladders (W/m^2)

/// Lower bounds of flare classes B, C, M, X.
pub const FLARE_CLASS_B: f64 = 1e-7;
pub const FLARE_CLASS_C: f64 = 1e-6;
pub const FLARE_CLASS_M: f64 = 1e-5;
pub const FLARE_CLASS_X: f64 = 1e-4;
/// Base flux of class A, used for sub-level designation.
pub const FLARE_CLASS_A: f64 = 1e-8;

/// Lower bounds of R1..R5 on long-wave flux. Below the first entry is R0.
pub const R_SCALE_LADDER: [f64; 5] = [1e-6, 1e-5, 5e-5, 1e-4, 5e-4];

/// Lower bounds of S1..S5 on >=10 MeV proton flux (pfu).
pub const S_SCALE_LADDER: [f64; 5] = [1e1, 1e2, 1e3, 1e4, 1e5];

/// Lower bounds of G1..G5 on Kp.
pub const G_SCALE_LADDER: [f64; 5] = [5.0, 6.0, 7.0, 8.0, 9.0];

// Sonification ranges

pub const VELOCITY_RANGE: (f64, f64) = (200.0, 800.0);
pub const MIDI_RANGE: (f64, f64) = (36.0, 84.0);
pub const A4_MIDI: f64 = 69.0;
pub const A4_FREQUENCY_HZ: f64 = 440.0;

pub const DENSITY_RANGE: (f64, f64) = (0.5, 50.0);
/// Decay at the low-density end first: higher density means a shorter decay.
pub const DECAY_RANGE_SECS: (f64, f64) = (5.0, 0.2);

/// Bz at or above this value produces no detune.
pub const DETUNE_BZ_THRESHOLD: f64 = -5.0;
pub const MAX_DETUNE_CENTS: f64 = -20.0;

/// Upper proton temperature bounds (K) of the U, O, A, E vowels. Hotter is I.
pub const VOWEL_TEMPERATURE_LADDER: [f64; 4] = [5.0e4, 1.0e5, 2.0e5, 4.0e5];

// Quiet baseline used when the solar wind record is missing.

pub const BASELINE_VELOCITY: f64 = 400.0;
pub const BASELINE_DENSITY: f64 = 5.0;
pub const BASELINE_BZ: f64 = 0.0;
pub const BASELINE_TEMPERATURE: f64 = 1.0e5;

/// Fields whose changes the detector tracks, in report order.
pub const TRACKED_FIELD_COUNT: usize = 5;
/// How many changes the sliding change window keeps.
pub const CHANGE_WINDOW_LEN: usize = 5;
/// How many shown insight ids the narrator remembers for dedupe.
pub const INSIGHT_HISTORY_LEN: usize = 20;
/// Maximum pending insights.
pub const INSIGHT_QUEUE_LEN: usize = 3;
