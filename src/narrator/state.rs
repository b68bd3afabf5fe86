use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use serde::{Deserialize, Serialize};

use crate::chord::AudioSnapshot;
use crate::constants::{INSIGHT_HISTORY_LEN, INSIGHT_QUEUE_LEN};
use crate::models::SpaceWeatherReading;
use crate::narrator::rules::{evaluate_rules, RuleContext};
use crate::narrator::{Insight, NarratorConfig};
use crate::utils::RingBuffer;

const ENABLE_LOGS: bool = true;

use crate::log_debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NarratorPhase {
    /// Nothing pending, nothing on screen.
    Idle,
    /// Insights waiting, none on screen.
    Queued,
    /// An insight is on screen inside its display window.
    Displaying,
}

/// Per-session narrator state. Create one when a session starts and thread it
/// through [`update_narrator`]; drop it when the session ends.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarratorState {
    /// Highest priority first, ties in detection order. Never longer than
    /// `INSIGHT_QUEUE_LEN`.
    queue: Vec<Insight>,
    current_insight: Option<Insight>,
    current_insight_started_at: Option<DateTime<Utc>>,
    /// Ids of insights already shown.
    insight_history: RingBuffer<String, INSIGHT_HISTORY_LEN>,
    /// Audio snapshot from the last update that carried data.
    #[serde(skip)]
    last_audio: Option<AudioSnapshot>,
}

impl NarratorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &[Insight] {
        &self.queue
    }

    /// The stored insight, whether or not its window has elapsed. Use
    /// [`get_current_insight`] for what should be on screen.
    pub fn current_insight(&self) -> Option<&Insight> {
        self.current_insight.as_ref()
    }

    pub fn current_insight_started_at(&self) -> Option<DateTime<Utc>> {
        self.current_insight_started_at
    }

    /// Shown ids, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> + '_ {
        self.insight_history.iter_oldest().map(String::as_str)
    }

    pub fn history_len(&self) -> usize {
        self.insight_history.len()
    }

    pub fn phase(&self, config: &NarratorConfig, now: DateTime<Utc>) -> NarratorPhase {
        if get_current_insight(self, config, now).is_some() {
            NarratorPhase::Displaying
        } else if !self.queue.is_empty() {
            NarratorPhase::Queued
        } else {
            NarratorPhase::Idle
        }
    }

    /// Recently shown, queued, or on screen.
    fn knows(&self, id: &str) -> bool {
        self.insight_history.iter_oldest().any(|seen| seen == id)
            || self.queue.iter().any(|queued| queued.id == id)
            || self.current_insight.as_ref().is_some_and(|shown| shown.id == id)
    }

    fn window_elapsed(&self, config: &NarratorConfig, now: DateTime<Utc>) -> bool {
        match (&self.current_insight, self.current_insight_started_at) {
            (Some(insight), Some(started_at)) => {
                now - started_at >= config.display_window(insight.priority)
            }
            _ => true,
        }
    }

    fn enqueue(&mut self, candidates: Vec<Insight>) {
        if candidates.is_empty() {
            return;
        }

        self.queue.extend(candidates);
        // Stable: queued entries stay ahead of new ones of equal priority.
        self.queue.sort_by_key(|insight| Reverse(insight.priority.rank()));

        if self.queue.len() > INSIGHT_QUEUE_LEN {
            for dropped in self.queue.drain(INSIGHT_QUEUE_LEN..) {
                log_debug!("queue full, dropping {} ({})", dropped.id, dropped.priority);
            }
        }
    }

    fn advance(&mut self, config: &NarratorConfig, now: DateTime<Utc>) {
        if !self.window_elapsed(config, now) {
            return;
        }

        if self.queue.is_empty() {
            self.current_insight = None;
            self.current_insight_started_at = None;
            return;
        }

        let next = self.queue.remove(0);
        log_debug!("showing insight {} ({})", next.id, next.priority);
        self.insight_history.push(next.id.clone());
        self.current_insight = Some(next);
        self.current_insight_started_at = Some(now);
    }
}

/// One narrator transition.
///
/// With a reading, the rule battery runs against `previous` and the audio
/// snapshot; candidates already shown recently, queued, or on screen are
/// dropped, the rest are ranked and merged into the queue. Then, if nothing
/// is on screen or its window has elapsed, the queue head is promoted.
/// Without a reading only that last step happens.
pub fn update_narrator(
    current: Option<&SpaceWeatherReading>,
    previous: Option<&SpaceWeatherReading>,
    audio: Option<&AudioSnapshot>,
    state: &NarratorState,
    config: &NarratorConfig,
    now: DateTime<Utc>,
) -> NarratorState {
    let mut next = state.clone();

    if let Some(current) = current {
        let ctx = RuleContext {
            current,
            previous,
            audio,
            previous_audio: state.last_audio.as_ref(),
            config,
            now,
        };

        let mut candidates: Vec<Insight> = evaluate_rules(&ctx)
            .into_iter()
            .filter(|candidate| {
                let known = state.knows(&candidate.id);
                if known {
                    log_debug!("suppressing repeat insight {}", candidate.id);
                }
                !known
            })
            .collect();
        candidates.sort_by_key(|candidate| Reverse(candidate.priority.rank()));
        next.enqueue(candidates);

        if let Some(audio) = audio.filter(|audio| audio.has_signal) {
            next.last_audio = Some(audio.clone());
        }
    }

    next.advance(config, now);
    next
}

/// The insight to show at `now`, if its display window is still open.
pub fn get_current_insight<'a>(
    state: &'a NarratorState,
    config: &NarratorConfig,
    now: DateTime<Utc>,
) -> Option<&'a Insight> {
    if state.window_elapsed(config, now) {
        None
    } else {
        state.current_insight.as_ref()
    }
}

/// Fraction of the current insight's display window that has passed, in [0, 1].
pub fn get_insight_progress(state: &NarratorState, config: &NarratorConfig, now: DateTime<Utc>) -> f64 {
    let (Some(insight), Some(started_at)) = (&state.current_insight, state.current_insight_started_at)
    else {
        return 0.0;
    };

    let window_ms = config.display_window(insight.priority).num_milliseconds();
    if window_ms <= 0 {
        return 1.0;
    }

    let elapsed_ms = (now - started_at).num_milliseconds();
    (elapsed_ms as f64 / window_ms as f64).clamp(0.0, 1.0)
}
