//! Alert threshold evaluator.
//!
//! Decides which push alerts a device should get for a new reading. Delivery,
//! retries and remembering what was already sent belong to the dispatcher.

pub mod evaluator;
pub mod preferences;
pub mod quiet_hours;

pub use evaluator::{
    evaluate_alert_events, AlertConfig, AlertEvent, AlertInput, AlertSnapshot, AlertType,
};
pub use preferences::{AlertThresholds, DevicePreferences, QuietHours};
pub use quiet_hours::{is_within_quiet_hours, resolve_timezone};
