//! Insight narrator.
//!
//! Turns state transitions in the data into a short, ranked queue of
//! educational insights and decides which one the overlay shows right now.
//! The state is a plain value owned by the caller; every transition returns a
//! new one.

pub mod config;
pub mod insight;
pub mod rules;
pub mod state;

pub use config::{DisplayWindows, NarratorConfig};
pub use insight::{Insight, InsightPriority, InsightTrack};
pub use state::{
    get_current_insight, get_insight_progress, update_narrator, NarratorPhase, NarratorState,
};
