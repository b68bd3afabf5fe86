use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    alerts::{evaluate_alert_events, AlertEvent, AlertInput, AlertSnapshot},
    changes::{detect_shock, Change, ChangeTracker, ShockSignature},
    chord::{map_chord, AudioSnapshot},
    classifier::{DerivedQuantities, NoaaScales},
    models::SpaceWeatherReading,
    narrator::{get_current_insight, get_insight_progress, update_narrator, Insight, NarratorState},
    settings::AppSettings,
    simulation::SyntheticFeed,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

/// What one reading produced across the engines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub timestamp: DateTime<Utc>,
    pub audio: AudioSnapshot,
    pub derived: DerivedQuantities,
    pub scales: NoaaScales,
    pub changes: Vec<Change>,
    pub shock: Option<ShockSignature>,
    pub alerts: Vec<AlertEvent>,
}

/// Runs every engine over a stream of readings and ticks.
///
/// Owns the state the engines hand back: the previous reading (inside the
/// change tracker), the narrator state, and the last alert snapshot.
pub struct Pipeline {
    settings: AppSettings,
    tracker: ChangeTracker,
    narrator: NarratorState,
    last_snapshot: Option<AlertSnapshot>,
    last_notification_at: Option<DateTime<Utc>>,
}

impl Pipeline {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            tracker: ChangeTracker::new(),
            narrator: NarratorState::new(),
            last_snapshot: None,
            last_notification_at: None,
        }
    }

    pub fn narrator(&self) -> &NarratorState {
        &self.narrator
    }

    pub fn last_notification_at(&self) -> Option<DateTime<Utc>> {
        self.last_notification_at
    }

    pub fn ingest(&mut self, reading: &SpaceWeatherReading, now: DateTime<Utc>) -> Frame {
        let previous = self.tracker.previous().cloned();
        let changes = self.tracker.observe(reading, now);
        let shock = detect_shock(reading, previous.as_ref(), &self.settings.narrator.shock);
        let audio = map_chord(reading);

        self.narrator = update_narrator(
            Some(reading),
            previous.as_ref(),
            Some(&audio),
            &self.narrator,
            &self.settings.narrator,
            now,
        );

        let snapshot = AlertSnapshot::from_reading(reading);
        let alerts = evaluate_alert_events(&AlertInput {
            current: &snapshot,
            previous: self.last_snapshot.as_ref(),
            preferences: &self.settings.device,
            config: &self.settings.alerts,
            now,
            last_notification_at: self.last_notification_at,
        });
        if !alerts.is_empty() {
            self.last_notification_at = Some(now);
        }
        self.last_snapshot = Some(snapshot);

        Frame {
            timestamp: reading.timestamp,
            audio,
            derived: DerivedQuantities::from_reading(reading),
            scales: NoaaScales::from_reading(reading),
            changes,
            shock,
            alerts,
        }
    }

    /// Advance the display queue without new data. Returns the insight that
    /// went on screen during this tick, if any.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<&Insight> {
        let before = self.narrator.current_insight_started_at();
        self.narrator = update_narrator(None, None, None, &self.narrator, &self.settings.narrator, now);
        if self.narrator.current_insight_started_at() == before {
            return None;
        }
        get_current_insight(&self.narrator, &self.settings.narrator, now)
    }

    pub fn current_insight(&self, now: DateTime<Utc>) -> Option<&Insight> {
        get_current_insight(&self.narrator, &self.settings.narrator, now)
    }

    pub fn insight_progress(&self, now: DateTime<Utc>) -> f64 {
        get_insight_progress(&self.narrator, &self.settings.narrator, now)
    }
}

/// Tick at the configured cadence, pull a synthetic reading every
/// `ticks_per_reading` ticks, and print insights and alerts as JSON lines
/// until `cancel_token` fires.
pub async fn feed_loop(settings: AppSettings, cancel_token: CancellationToken) -> Result<()> {
    let tick = Duration::from_millis(settings.feed.tick_millis);
    let ticks_per_reading = settings.feed.ticks_per_reading();

    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut feed = SyntheticFeed::new();
    let mut pipeline = Pipeline::new(settings);
    let mut tick_count: u64 = 0;

    log_info!(
        "feed loop started: tick {:?}, reading every {} ticks",
        tick,
        ticks_per_reading
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Utc::now();
                let shown_before = pipeline.narrator().current_insight_started_at();

                if tick_count % ticks_per_reading == 0 {
                    let reading = feed.next_reading(now);
                    let frame = pipeline.ingest(&reading, now);
                    log_debug!(
                        "reading: {} at {:.1} Hz, {} change(s)",
                        frame.audio.condition,
                        frame.audio.frequency_hz,
                        frame.changes.len()
                    );
                    if let Some(shock) = &frame.shock {
                        log_info!(
                            "shock signature: +{:.0} km/s, bz {:+.1} nT",
                            shock.delta_velocity,
                            shock.delta_bz
                        );
                    }
                    for alert in &frame.alerts {
                        log_info!("alert {} ({})", alert.dedupe_key, alert.title);
                        emit("alert", alert)?;
                    }
                } else {
                    pipeline.tick(now);
                }

                if pipeline.narrator().current_insight_started_at() != shown_before {
                    if let Some(insight) = pipeline.current_insight(now) {
                        log_info!("insight on screen: {} [{}]", insight.id, insight.priority);
                        emit("insight", insight)?;
                    }
                }

                tick_count = tick_count.wrapping_add(1);
            }
            _ = cancel_token.cancelled() => {
                log_info!("feed loop shutting down");
                break;
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct Emitted<'a, T: Serialize> {
    kind: &'a str,
    payload: &'a T,
}

fn emit<T: Serialize>(kind: &str, payload: &T) -> Result<()> {
    let line = serde_json::to_string(&Emitted { kind, payload })
        .with_context(|| format!("failed to serialize {kind}"))?;
    println!("{line}");
    Ok(())
}

/// Cancel `token` on Ctrl-C.
pub fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log_info!("received Ctrl-C");
                token.cancel();
            }
            Err(err) => log_error!("failed to listen for Ctrl-C: {err:?}"),
        }
    });
}
