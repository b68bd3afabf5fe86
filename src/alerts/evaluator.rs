use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alerts::{is_within_quiet_hours, DevicePreferences};
use crate::models::{FlareClass, SpaceWeatherReading};

const ENABLE_LOGS: bool = false;

use crate::log_debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AlertType {
    KpThreshold,
    BzThreshold,
    FlareClass,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub body: String,
    /// Stable per alert type and threshold, e.g. `"kp-5"`.
    pub dedupe_key: String,
}

/// The classified values alerts are judged on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlertSnapshot {
    pub kp: Option<f64>,
    pub bz: Option<f64>,
    pub flare_class: Option<FlareClass>,
}

impl AlertSnapshot {
    pub fn from_reading(reading: &SpaceWeatherReading) -> Self {
        Self {
            kp: reading.kp(),
            bz: reading.bz(),
            flare_class: reading.flare_letter(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertConfig {
    /// No alert of any kind within this many minutes of the last one sent.
    pub min_interval_minutes: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            min_interval_minutes: 5,
        }
    }
}

impl AlertConfig {
    /// One week.
    pub const MAX_INTERVAL_MINUTES: i64 = 7 * 24 * 60;

    pub fn validate(&self) -> Result<()> {
        if !(0..=Self::MAX_INTERVAL_MINUTES).contains(&self.min_interval_minutes) {
            bail!(
                "Invalid alert interval {} minutes. Must be between 0 and {}",
                self.min_interval_minutes,
                Self::MAX_INTERVAL_MINUTES
            );
        }
        Ok(())
    }
}

/// Everything the evaluator needs. `now` and `last_notification_at` are
/// supplied by the caller.
#[derive(Debug, Clone)]
pub struct AlertInput<'a> {
    pub current: &'a AlertSnapshot,
    pub previous: Option<&'a AlertSnapshot>,
    pub preferences: &'a DevicePreferences,
    pub config: &'a AlertConfig,
    pub now: DateTime<Utc>,
    pub last_notification_at: Option<DateTime<Utc>>,
}

/// Evaluate the threshold rules for one device.
///
/// Returns nothing when alerts are disabled, during quiet hours, or within
/// the rate-limit interval of the last notification. Otherwise each of the
/// Kp, Bz and flare rules may add one event; they are edge-triggered against
/// `previous`.
pub fn evaluate_alert_events(input: &AlertInput<'_>) -> Vec<AlertEvent> {
    let prefs = input.preferences;

    if !prefs.alerts_enabled {
        log_debug!("alerts disabled for {}", prefs.install_id);
        return Vec::new();
    }

    if let Some(quiet) = &prefs.quiet_hours {
        if is_within_quiet_hours(input.now, quiet, &prefs.timezone) {
            log_debug!("quiet hours for {}", prefs.install_id);
            return Vec::new();
        }
    }

    if let Some(last) = input.last_notification_at {
        // An interval too large to represent never elapses.
        let limited = Duration::try_minutes(input.config.min_interval_minutes)
            .map_or(true, |interval| input.now - last < interval);
        if limited {
            log_debug!("rate limited {} (last sent {})", prefs.install_id, last);
            return Vec::new();
        }
    }

    let Some(previous) = input.previous else {
        return Vec::new();
    };

    [
        kp_alert(input, previous),
        bz_alert(input, previous),
        flare_alert(input, previous),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn event(
    input: &AlertInput<'_>,
    alert_type: AlertType,
    dedupe_key: String,
    title: String,
    body: String,
) -> AlertEvent {
    let name = format!("{}@{}", dedupe_key, input.now.timestamp_millis());
    AlertEvent {
        id: Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string(),
        alert_type,
        title,
        body,
        dedupe_key,
    }
}

fn kp_alert(input: &AlertInput<'_>, previous: &AlertSnapshot) -> Option<AlertEvent> {
    let threshold = input.preferences.thresholds.kp;
    let (before, after) = (previous.kp?, input.current.kp?);
    let level = threshold as f64;

    if !(before < level && level <= after) {
        return None;
    }

    Some(event(
        input,
        AlertType::KpThreshold,
        format!("kp-{}", threshold),
        format!("Geomagnetic activity: Kp {:.1}", after),
        format!(
            "The planetary K index rose from {:.1} to {:.1}, crossing your alert level of {}. \
             Aurora may be visible further from the poles than usual.",
            before, after, threshold
        ),
    ))
}

fn bz_alert(input: &AlertInput<'_>, previous: &AlertSnapshot) -> Option<AlertEvent> {
    let threshold = input.preferences.thresholds.bz_south;
    let (before, after) = (previous.bz?, input.current.bz?);
    let boundary = -(threshold as f64).abs();

    if !(before > boundary && boundary >= after) {
        return None;
    }

    Some(event(
        input,
        AlertType::BzThreshold,
        format!("bz-{}", threshold),
        format!("Southward magnetic field: Bz {:.1} nT", after),
        format!(
            "The interplanetary magnetic field turned south past -{} nT. \
             Strong southward Bz lets solar wind energy into Earth's magnetosphere.",
            threshold
        ),
    ))
}

fn flare_alert(input: &AlertInput<'_>, previous: &AlertSnapshot) -> Option<AlertEvent> {
    let after = input.current.flare_class?;
    if previous.flare_class == Some(after) {
        return None;
    }
    if !input.preferences.thresholds.flare_classes.contains(&after) {
        return None;
    }

    Some(event(
        input,
        AlertType::FlareClass,
        format!("flare-{}", after),
        format!("{}-class solar flare", after),
        format!(
            "GOES X-ray flux reached {} class. Expect possible HF radio disruption on the \
             sunlit side of Earth.",
            after
        ),
    ))
}
