pub mod detector;
pub mod shock;

pub use detector::{detect_changes, Change, ChangeTracker, ChangeWindow, TrackedField};
pub use shock::{detect_shock, ShockSignature, ShockThresholds};
