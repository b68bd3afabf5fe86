use anyhow::{bail, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::changes::ShockThresholds;
use crate::narrator::InsightPriority;

/// How long an insight stays on screen, per priority. Must rise with priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayWindows {
    pub ambient_secs: f64,
    pub notable_secs: f64,
    pub significant_secs: f64,
    pub breakthrough_secs: f64,
}

impl Default for DisplayWindows {
    fn default() -> Self {
        Self {
            ambient_secs: 4.0,
            notable_secs: 6.0,
            significant_secs: 9.0,
            breakthrough_secs: 12.0,
        }
    }
}

/// Tunable narrator parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NarratorConfig {
    #[serde(default)]
    pub display_windows: DisplayWindows,
    #[serde(default)]
    pub shock: ShockThresholds,
}

impl NarratorConfig {
    pub fn display_window(&self, priority: InsightPriority) -> Duration {
        let secs = match priority {
            InsightPriority::Ambient => self.display_windows.ambient_secs,
            InsightPriority::Notable => self.display_windows.notable_secs,
            InsightPriority::Significant => self.display_windows.significant_secs,
            InsightPriority::Breakthrough => self.display_windows.breakthrough_secs,
        };
        Duration::milliseconds((secs * 1000.0).round() as i64)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.display_windows;
        let windows = [
            w.ambient_secs,
            w.notable_secs,
            w.significant_secs,
            w.breakthrough_secs,
        ];

        if windows.iter().any(|secs| !secs.is_finite() || *secs <= 0.0) {
            bail!("Display windows must be positive, finite seconds");
        }
        if !windows.windows(2).all(|pair| pair[0] < pair[1]) {
            bail!("Display windows must increase with priority (ambient < notable < significant < breakthrough)");
        }
        if !(self.shock.velocity_jump_kms > 0.0) || !(self.shock.bz_jump_nt > 0.0) {
            bail!("Shock thresholds must be positive");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_monotonic() {
        let config = NarratorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.display_window(InsightPriority::Ambient), Duration::seconds(4));
        assert_eq!(
            config.display_window(InsightPriority::Breakthrough),
            Duration::seconds(12)
        );
    }

    #[test]
    fn rejects_non_monotonic_windows() {
        let mut config = NarratorConfig::default();
        config.display_windows.notable_secs = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_values() {
        let mut config = NarratorConfig::default();
        config.display_windows.ambient_secs = 0.0;
        assert!(config.validate().is_err());

        let mut config = NarratorConfig::default();
        config.shock.bz_jump_nt = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: NarratorConfig =
            serde_json::from_str(r#"{"shock": {"velocityJumpKms": 200.0, "bzJumpNt": 6.0}}"#)
                .unwrap();
        assert_eq!(config.shock.velocity_jump_kms, 200.0);
        assert_eq!(config.display_windows, DisplayWindows::default());
    }
}
