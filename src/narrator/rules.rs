//! Insight rule battery.
//!
//! Each rule looks at the current and previous reading (and audio snapshot)
//! and yields at most one candidate. Rules are edge-triggered: they fire on
//! the transition into a condition, never while it persists. Evaluation order
//! is fixed and breaks priority ties.

use chrono::{DateTime, Utc};

use crate::changes::detect_shock;
use crate::chord::AudioSnapshot;
use crate::classifier::{classify, flare_designation};
use crate::models::{Condition, FlareClass, SpaceWeatherReading};
use crate::narrator::{Insight, InsightPriority, InsightTrack, NarratorConfig};

const KP_STORM: f64 = 5.0;
const KP_SEVERE: f64 = 7.0;
const FAST_WIND_KMS: f64 = 500.0;
const EXTREME_WIND_KMS: f64 = 700.0;
const DENSITY_SURGE: f64 = 20.0;
const RECONNECTION_BZ: f64 = -10.0;
const PITCH_LEAP_SEMITONES: i16 = 7;

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub current: &'a SpaceWeatherReading,
    pub previous: Option<&'a SpaceWeatherReading>,
    pub audio: Option<&'a AudioSnapshot>,
    pub previous_audio: Option<&'a AudioSnapshot>,
    pub config: &'a NarratorConfig,
    pub now: DateTime<Utc>,
}

type Rule = fn(&RuleContext<'_>) -> Option<Insight>;

const RULES: &[Rule] = &[
    // space weather
    cme_shock_arrival,
    kp_severe_storm,
    kp_storm_onset,
    wind_speed_extreme,
    wind_speed_fast,
    density_surge,
    condition_escalation,
    conditions_calming,
    // electromagnetism
    flare_x_class,
    flare_m_class,
    bz_reconnection,
    bz_southward_turn,
    bz_northward_turn,
    // acoustics
    pitch_leap,
    detune_onset,
    harmony_change,
    vowel_shift,
];

/// Run every rule in order and collect the candidates.
pub fn evaluate_rules(ctx: &RuleContext<'_>) -> Vec<Insight> {
    RULES.iter().filter_map(|rule| rule(ctx)).collect()
}

struct Draft {
    id: String,
    track: InsightTrack,
    priority: InsightPriority,
    headline: String,
    explanation: String,
    data_connection: String,
    sound_connection: String,
}

impl Draft {
    fn into_insight(self, now: DateTime<Utc>) -> Insight {
        Insight {
            id: self.id,
            track: self.track,
            priority: self.priority,
            headline: self.headline,
            explanation: self.explanation,
            data_connection: self.data_connection,
            sound_connection: self.sound_connection,
            created_at: now,
        }
    }
}

fn crossed_above(previous: f64, current: f64, threshold: f64) -> bool {
    previous < threshold && current >= threshold
}

fn crossed_below(previous: f64, current: f64, threshold: f64) -> bool {
    previous > threshold && current <= threshold
}

/// Both readings' values of one field, when both are present.
fn pair(
    ctx: &RuleContext<'_>,
    read: impl Fn(&SpaceWeatherReading) -> Option<f64>,
) -> Option<(f64, f64)> {
    Some((read(ctx.previous?)?, read(ctx.current)?))
}

fn cme_shock_arrival(ctx: &RuleContext<'_>) -> Option<Insight> {
    let shock = detect_shock(ctx.current, ctx.previous, &ctx.config.shock)?;
    Some(
        Draft {
            id: "cme-shock-arrival".into(),
            track: InsightTrack::SpaceWeather,
            priority: InsightPriority::Breakthrough,
            headline: "A shock front just swept past the spacecraft".into(),
            explanation: "Solar wind speed and the magnetic field jumped at the same moment. \
                That signature usually marks the leading edge of a coronal mass ejection, \
                a billion-ton cloud of magnetized plasma thrown off the Sun."
                .into(),
            data_connection: format!(
                "Speed changed by {:+.0} km/s while Bz swung {:+.1} nT in one update.",
                shock.delta_velocity, shock.delta_bz
            ),
            sound_connection: "The root note leapt and the chord lost its steadiness together."
                .into(),
        }
        .into_insight(ctx.now),
    )
}

fn kp_severe_storm(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = pair(ctx, SpaceWeatherReading::kp)?;
    if !crossed_above(before, after, KP_SEVERE) {
        return None;
    }

    Some(
        Draft {
            id: "kp-severe-storm".into(),
            track: InsightTrack::SpaceWeather,
            priority: InsightPriority::Breakthrough,
            headline: "Strong geomagnetic storm under way".into(),
            explanation: "A planetary K index of 7 or more means magnetometers worldwide see \
                large swings. Aurora can reach mid-latitudes and power grids take notice."
                .into(),
            data_connection: format!("Kp rose from {:.1} to {:.1}.", before, after),
            sound_connection: "The harmony has moved into its most dissonant voicings.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn kp_storm_onset(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = pair(ctx, SpaceWeatherReading::kp)?;
    if !crossed_above(before, after, KP_STORM) {
        return None;
    }

    Some(
        Draft {
            id: "kp-storm-onset".into(),
            track: InsightTrack::SpaceWeather,
            priority: InsightPriority::Significant,
            headline: "Storm threshold crossed".into(),
            explanation: "Kp 5 is where NOAA starts calling it a geomagnetic storm (G1). \
                Energy from the solar wind is now pouring into the magnetosphere."
                .into(),
            data_connection: format!("Kp went from {:.1} to {:.1}.", before, after),
            sound_connection: "The chord turned minor as the condition reached storm level."
                .into(),
        }
        .into_insight(ctx.now),
    )
}

fn wind_speed_extreme(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = pair(ctx, SpaceWeatherReading::velocity)?;
    if !crossed_above(before, after, EXTREME_WIND_KMS) {
        return None;
    }

    Some(
        Draft {
            id: "wind-speed-extreme".into(),
            track: InsightTrack::SpaceWeather,
            priority: InsightPriority::Significant,
            headline: "Solar wind above 700 km/s".into(),
            explanation: "Wind this fast usually comes from a coronal hole or a passing CME. \
                It would cross the Earth-Sun distance in under three days."
                .into(),
            data_connection: format!("Speed rose from {:.0} to {:.0} km/s.", before, after),
            sound_connection: "The root note is near the top of its range.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn wind_speed_fast(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = pair(ctx, SpaceWeatherReading::velocity)?;
    if !crossed_above(before, after, FAST_WIND_KMS) {
        return None;
    }

    Some(
        Draft {
            id: "wind-speed-fast".into(),
            track: InsightTrack::SpaceWeather,
            priority: InsightPriority::Notable,
            headline: "Fast solar wind arriving".into(),
            explanation: "Typical solar wind blows at about 400 km/s. Above 500 km/s we are \
                likely inside a high-speed stream."
                .into(),
            data_connection: format!("Speed went from {:.0} to {:.0} km/s.", before, after),
            sound_connection: "Faster wind raises the pitch you are hearing.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn density_surge(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = pair(ctx, SpaceWeatherReading::density)?;
    if !crossed_above(before, after, DENSITY_SURGE) {
        return None;
    }

    Some(
        Draft {
            id: "density-surge".into(),
            track: InsightTrack::SpaceWeather,
            priority: InsightPriority::Notable,
            headline: "Dense plasma pile-up".into(),
            explanation: "Density above 20 protons per cubic centimetre often means compressed \
                plasma ahead of faster wind, pushing hard on Earth's magnetic shield."
                .into(),
            data_connection: format!("Density went from {:.1} to {:.1} p/cm³.", before, after),
            sound_connection: "Denser plasma shortens each note's decay.".into(),
        }
        .into_insight(ctx.now),
    )
}

/// Classify both readings, but only when each carries at least one of kp,
/// velocity or bz. A reading with none of them has no condition to compare.
fn condition_pair(ctx: &RuleContext<'_>) -> Option<(Condition, Condition)> {
    let observed = |r: &SpaceWeatherReading| r.kp().is_some() || r.velocity().is_some() || r.bz().is_some();
    let previous = ctx.previous?;
    if !(observed(previous) && observed(ctx.current)) {
        return None;
    }
    Some((classify(previous), classify(ctx.current)))
}

fn condition_escalation(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = condition_pair(ctx)?;
    if after <= before {
        return None;
    }

    Some(
        Draft {
            id: format!("condition-escalation-{}", after.as_str()),
            track: InsightTrack::SpaceWeather,
            priority: InsightPriority::Notable,
            headline: format!("Conditions escalated to {}", after.as_str().replace('_', " ")),
            explanation: "The overall condition takes the worst of Kp, wind speed and \
                southward field. One of them just moved into a higher tier."
                .into(),
            data_connection: format!("Condition went from {} to {}.", before, after),
            sound_connection: "The harmonic set changes with each condition tier.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn conditions_calming(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = condition_pair(ctx)?;
    if !(after == Condition::Quiet && before > Condition::Quiet) {
        return None;
    }

    Some(
        Draft {
            id: "conditions-calming".into(),
            track: InsightTrack::SpaceWeather,
            priority: InsightPriority::Ambient,
            headline: "Space weather has settled".into(),
            explanation: "Kp, wind speed and the magnetic field are all back below their \
                activity thresholds."
                .into(),
            data_connection: format!("Condition returned to quiet from {}.", before),
            sound_connection: "The chord has resolved back to a major triad.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn flare_pair(ctx: &RuleContext<'_>) -> Option<(Option<FlareClass>, FlareClass)> {
    Some((ctx.previous?.flare_letter(), ctx.current.flare_letter()?))
}

fn flare_label(ctx: &RuleContext<'_>, letter: FlareClass) -> String {
    ctx.current
        .short_wave_flux()
        .map(flare_designation)
        .unwrap_or_else(|| letter.to_string())
}

fn flare_x_class(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = flare_pair(ctx)?;
    if after != FlareClass::X || before == Some(FlareClass::X) {
        return None;
    }

    Some(
        Draft {
            id: "flare-x-class".into(),
            track: InsightTrack::Electromagnetism,
            priority: InsightPriority::Breakthrough,
            headline: "X-class solar flare".into(),
            explanation: "X-class flares are the strongest category. Their X-rays reach Earth in \
                about eight minutes and can black out HF radio on the sunlit side."
                .into(),
            data_connection: format!("GOES X-ray flux now reads {}.", flare_label(ctx, after)),
            sound_connection: "The overtones brighten with the X-ray surge.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn flare_m_class(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = flare_pair(ctx)?;
    if after != FlareClass::M || before.is_some_and(|letter| letter >= FlareClass::M) {
        return None;
    }

    Some(
        Draft {
            id: "flare-m-class".into(),
            track: InsightTrack::Electromagnetism,
            priority: InsightPriority::Significant,
            headline: "M-class flare in progress".into(),
            explanation: "M flares are ten times weaker than X flares but still strong enough to \
                cause brief radio blackouts near the poles."
                .into(),
            data_connection: format!("GOES X-ray flux now reads {}.", flare_label(ctx, after)),
            sound_connection: "Listen for the brighter upper partials.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn bz_reconnection(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = pair(ctx, SpaceWeatherReading::bz)?;
    if !crossed_below(before, after, RECONNECTION_BZ) {
        return None;
    }

    Some(
        Draft {
            id: "bz-reconnection".into(),
            track: InsightTrack::Electromagnetism,
            priority: InsightPriority::Significant,
            headline: "Strong southward field: the magnetosphere is open".into(),
            explanation: "When the interplanetary field points strongly south it reconnects with \
                Earth's northward field, letting solar wind energy stream into the magnetotail."
                .into(),
            data_connection: format!("Bz dropped from {:.1} to {:.1} nT.", before, after),
            sound_connection: "The detune is pulling the voices apart.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn bz_southward_turn(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = pair(ctx, SpaceWeatherReading::bz)?;
    if !(before >= 0.0 && after < 0.0) {
        return None;
    }

    Some(
        Draft {
            id: "bz-southward-turn".into(),
            track: InsightTrack::Electromagnetism,
            priority: InsightPriority::Notable,
            headline: "The IMF turned south".into(),
            explanation: "Bz is the north-south part of the Sun's magnetic field out here. \
                Southward is the orientation that couples best with Earth's field."
                .into(),
            data_connection: format!("Bz flipped from {:+.1} to {:+.1} nT.", before, after),
            sound_connection: "Keep listening: more southward field adds detune.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn bz_northward_turn(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = pair(ctx, SpaceWeatherReading::bz)?;
    if !(before < 0.0 && after >= 0.0) {
        return None;
    }

    Some(
        Draft {
            id: "bz-northward-turn".into(),
            track: InsightTrack::Electromagnetism,
            priority: InsightPriority::Ambient,
            headline: "The IMF turned back north".into(),
            explanation: "A northward field closes the door reconnection opened; the \
                magnetosphere starts to recover."
                .into(),
            data_connection: format!("Bz flipped from {:+.1} to {:+.1} nT.", before, after),
            sound_connection: "The voices settle back in tune.".into(),
        }
        .into_insight(ctx.now),
    )
}

/// Both audio snapshots, when both were built from real solar wind data.
fn audio_pair<'a>(ctx: &RuleContext<'a>) -> Option<(&'a AudioSnapshot, &'a AudioSnapshot)> {
    let (before, after) = (ctx.previous_audio?, ctx.audio?);
    (before.has_signal && after.has_signal).then_some((before, after))
}

fn pitch_leap(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = audio_pair(ctx)?;
    let leap = after.midi_note as i16 - before.midi_note as i16;
    if leap.abs() < PITCH_LEAP_SEMITONES {
        return None;
    }

    Some(
        Draft {
            id: "pitch-leap".into(),
            track: InsightTrack::Acoustics,
            priority: InsightPriority::Notable,
            headline: format!(
                "The melody jumped a {}",
                if leap > 0 { "fifth or more up" } else { "fifth or more down" }
            ),
            explanation: "Pitch tracks solar wind speed on a straight line from 200 to 800 km/s \
                across four octaves, so a big leap means a big change in speed."
                .into(),
            data_connection: format!(
                "{} to {} ({:+} semitones).",
                before.note_name, after.note_name, leap
            ),
            sound_connection: format!("Root now at {:.1} Hz.", after.frequency_hz),
        }
        .into_insight(ctx.now),
    )
}

fn detune_onset(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = audio_pair(ctx)?;
    if !(before.detune_cents == 0 && after.detune_cents != 0) {
        return None;
    }

    Some(
        Draft {
            id: "detune-onset".into(),
            track: InsightTrack::Acoustics,
            priority: InsightPriority::Notable,
            headline: "Hear the beating?".into(),
            explanation: "Two slightly mistuned tones interfere and produce a slow wobble called \
                beating. The sonification adds it when Bz drops below -5 nT."
                .into(),
            data_connection: format!("Detune is now {} cents.", after.detune_cents),
            sound_connection: "The wobble speeds up as the field turns further south.".into(),
        }
        .into_insight(ctx.now),
    )
}

fn harmony_change(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = audio_pair(ctx)?;
    if before.condition == after.condition {
        return None;
    }

    Some(
        Draft {
            id: "harmony-change".into(),
            track: InsightTrack::Acoustics,
            priority: InsightPriority::Ambient,
            headline: "The chord changed color".into(),
            explanation: "Consonant intervals have simple frequency ratios like 5:4 and 3:2. \
                As activity rises the sonification swaps them for tenser, less simple ratios."
                .into(),
            data_connection: format!("Condition moved from {} to {}.", before.condition, after.condition),
            sound_connection: format!("Now playing {} partials.", after.harmonics_hz.len()),
        }
        .into_insight(ctx.now),
    )
}

fn vowel_shift(ctx: &RuleContext<'_>) -> Option<Insight> {
    let (before, after) = audio_pair(ctx)?;
    if before.vowel == after.vowel {
        return None;
    }

    Some(
        Draft {
            id: "vowel-shift".into(),
            track: InsightTrack::Acoustics,
            priority: InsightPriority::Ambient,
            headline: format!("The voice shifted from \"{}\" to \"{}\"", before.vowel, after.vowel),
            explanation: "Vowels differ by their formants, resonant peaks in the spectrum. \
                Hotter plasma moves the formants up toward a brighter vowel."
                .into(),
            data_connection: "Proton temperature crossed one of the vowel boundaries.".into(),
            sound_connection: "Same notes, different resonance.".into(),
        }
        .into_insight(ctx.now),
    )
}
