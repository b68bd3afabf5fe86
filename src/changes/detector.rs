//! Change/event detector.
//!
//! Compares a reading against the one before it, field by field. Any exact
//! difference is reported; deciding what is significant is left to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{CHANGE_WINDOW_LEN, TRACKED_FIELD_COUNT};
use crate::models::SpaceWeatherReading;
use crate::utils::RingBuffer;

const ENABLE_LOGS: bool = false;

use crate::log_debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TrackedField {
    Velocity,
    Density,
    Bz,
    Temperature,
    Kp,
}

impl TrackedField {
    /// Report order.
    pub const ALL: [TrackedField; TRACKED_FIELD_COUNT] = [
        TrackedField::Velocity,
        TrackedField::Density,
        TrackedField::Bz,
        TrackedField::Temperature,
        TrackedField::Kp,
    ];

    pub fn read(&self, reading: &SpaceWeatherReading) -> Option<f64> {
        match self {
            TrackedField::Velocity => reading.velocity(),
            TrackedField::Density => reading.density(),
            TrackedField::Bz => reading.bz(),
            TrackedField::Temperature => reading.temperature(),
            TrackedField::Kp => reading.kp(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedField::Velocity => "velocity",
            TrackedField::Density => "density",
            TrackedField::Bz => "bz",
            TrackedField::Temperature => "temperature",
            TrackedField::Kp => "kp",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub field: TrackedField,
    pub previous: f64,
    pub current: f64,
    /// `current - previous`
    pub delta: f64,
    pub timestamp: DateTime<Utc>,
}

/// Changes between two readings, in [`TrackedField::ALL`] order. A field is
/// reported only when both readings carry it and the values differ. Without a
/// previous reading nothing is reported.
pub fn detect_changes(
    current: &SpaceWeatherReading,
    previous: Option<&SpaceWeatherReading>,
    now: DateTime<Utc>,
) -> Vec<Change> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    TrackedField::ALL
        .iter()
        .filter_map(|field| {
            let before = field.read(previous)?;
            let after = field.read(current)?;
            (after != before).then(|| Change {
                field: *field,
                previous: before,
                current: after,
                delta: after - before,
                timestamp: now,
            })
        })
        .collect()
}

/// Sliding window over the most recent changes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeWindow {
    changes: RingBuffer<Change, CHANGE_WINDOW_LEN>,
}

impl ChangeWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, changes: &[Change]) {
        for change in changes {
            self.changes.push(change.clone());
        }
    }

    /// Newest first.
    pub fn recent(&self) -> Vec<Change> {
        self.changes.iter_newest().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Remembers the previous reading so callers only hand over the new one.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    previous: Option<SpaceWeatherReading>,
    window: ChangeWindow,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `reading` against the last observed one, record the result and
    /// keep `reading` as the new baseline.
    pub fn observe(&mut self, reading: &SpaceWeatherReading, now: DateTime<Utc>) -> Vec<Change> {
        let changes = detect_changes(reading, self.previous.as_ref(), now);
        if !changes.is_empty() {
            log_debug!(
                "{} field change(s): {}",
                changes.len(),
                changes
                    .iter()
                    .map(|c| format!("{} {:+.2}", c.field.as_str(), c.delta))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        self.window.record(&changes);
        self.previous = Some(reading.clone());
        changes
    }

    pub fn previous(&self) -> Option<&SpaceWeatherReading> {
        self.previous.as_ref()
    }

    pub fn window(&self) -> &ChangeWindow {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SolarWind;
    use chrono::Duration;

    fn reading(velocity: f64, density: f64, bz: f64, kp: f64) -> SpaceWeatherReading {
        SpaceWeatherReading::empty(Utc::now())
            .with_solar_wind(SolarWind {
                velocity,
                density,
                bz,
                bx: None,
                by: None,
                bt: None,
                temperature: 1.0e5,
            })
            .with_kp(kp)
    }

    #[test]
    fn first_observation_reports_nothing() {
        let now = Utc::now();
        assert!(detect_changes(&reading(400.0, 5.0, 0.0, 2.0), None, now).is_empty());

        let mut tracker = ChangeTracker::new();
        assert!(tracker.observe(&reading(400.0, 5.0, 0.0, 2.0), now).is_empty());
        assert!(tracker.window().is_empty());
    }

    #[test]
    fn identical_readings_report_nothing() {
        let now = Utc::now();
        let r = reading(400.0, 5.0, -1.0, 2.0);
        let mut tracker = ChangeTracker::new();
        tracker.observe(&r, now);
        assert!(tracker.observe(&r, now).is_empty());
        assert!(tracker.observe(&r, now).is_empty());
    }

    #[test]
    fn tiny_differences_are_reported_exactly() {
        let now = Utc::now();
        let before = reading(400.0, 5.0, -1.0, 2.0);
        let after = reading(400.1, 5.0, -1.0, 2.0);
        let changes = detect_changes(&after, Some(&before), now);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, TrackedField::Velocity);
        assert_eq!(changes[0].previous, 400.0);
        assert_eq!(changes[0].current, 400.1);
        assert!((changes[0].delta - 0.1).abs() < 1e-9);
        assert_eq!(changes[0].timestamp, now);
    }

    #[test]
    fn fields_missing_on_either_side_are_skipped() {
        let now = Utc::now();
        let before = reading(400.0, 5.0, -1.0, 2.0);
        let mut after = SpaceWeatherReading::empty(now).with_kp(3.0);
        after.solar_wind = None;

        let changes = detect_changes(&after, Some(&before), now);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, TrackedField::Kp);
        assert_eq!(changes[0].delta, 1.0);
    }

    #[test]
    fn changes_follow_field_order() {
        let now = Utc::now();
        let before = reading(400.0, 5.0, -1.0, 2.0);
        let after = reading(450.0, 6.0, -3.0, 4.0);
        let fields: Vec<_> = detect_changes(&after, Some(&before), now)
            .into_iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(
            fields,
            vec![
                TrackedField::Velocity,
                TrackedField::Density,
                TrackedField::Bz,
                TrackedField::Kp
            ]
        );
    }

    #[test]
    fn window_keeps_newest_five() {
        let start = Utc::now();
        let mut tracker = ChangeTracker::new();
        for step in 0..8 {
            let now = start + Duration::seconds(step);
            tracker.observe(&reading(400.0 + step as f64, 5.0, 0.0, 2.0), now);
        }

        let recent = tracker.window().recent();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].current, 407.0);
        assert_eq!(recent[4].current, 403.0);
        assert!(recent.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }
}
