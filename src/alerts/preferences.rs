//! Per-device alert preferences.
//!
//! These arrive from the device registration flow; the evaluator only reads them.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alerts::quiet_hours::parse_timezone;
use crate::models::FlareClass;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertThresholds {
    /// Kp level, 1-9.
    pub kp: u8,
    /// Southward Bz magnitude in nT, 1-30. Stored positive.
    pub bz_south: u8,
    pub flare_classes: Vec<FlareClass>,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            kp: 5,
            bz_south: 10,
            flare_classes: vec![FlareClass::M, FlareClass::X],
        }
    }
}

/// Local-time window in which alerts are held back. `start_hour > end_hour`
/// wraps midnight; equal hours mean all day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuietHours {
    pub start_hour: u8,
    pub end_hour: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DevicePreferences {
    pub install_id: String,
    pub alerts_enabled: bool,
    #[serde(default)]
    pub thresholds: AlertThresholds,
    #[serde(default)]
    pub quiet_hours: Option<QuietHours>,
    /// IANA zone name used to resolve quiet hours, e.g. "America/Denver".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".into()
}

impl Default for DevicePreferences {
    fn default() -> Self {
        Self {
            install_id: Uuid::new_v4().to_string(),
            alerts_enabled: true,
            thresholds: AlertThresholds::default(),
            quiet_hours: None,
            timezone: default_timezone(),
        }
    }
}

impl DevicePreferences {
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.thresholds.kp) {
            bail!("Invalid Kp threshold {}. Must be between 1 and 9", self.thresholds.kp);
        }
        if !(1..=30).contains(&self.thresholds.bz_south) {
            bail!(
                "Invalid Bz threshold {}. Must be a magnitude between 1 and 30 nT",
                self.thresholds.bz_south
            );
        }
        if let Some(quiet) = self.quiet_hours {
            if quiet.start_hour > 23 || quiet.end_hour > 23 {
                bail!(
                    "Invalid quiet hours {}-{}. Hours must be between 0 and 23",
                    quiet.start_hour,
                    quiet.end_hour
                );
            }
        }
        if parse_timezone(&self.timezone).is_none() {
            bail!("Unknown time zone {:?}", self.timezone);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        DevicePreferences::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut prefs = DevicePreferences::default();
        prefs.thresholds.kp = 0;
        assert!(prefs.validate().is_err());

        let mut prefs = DevicePreferences::default();
        prefs.thresholds.bz_south = 31;
        assert!(prefs.validate().is_err());

        let mut prefs = DevicePreferences::default();
        prefs.quiet_hours = Some(QuietHours {
            start_hour: 24,
            end_hour: 7,
        });
        assert!(prefs.validate().is_err());

        let mut prefs = DevicePreferences::default();
        prefs.timezone = "Mars/Olympus_Mons".into();
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn deserializes_minimal_payload() {
        let prefs: DevicePreferences =
            serde_json::from_str(r#"{"installId": "abc", "alertsEnabled": false}"#).unwrap();
        assert_eq!(prefs.install_id, "abc");
        assert!(!prefs.alerts_enabled);
        assert_eq!(prefs.thresholds, AlertThresholds::default());
        assert_eq!(prefs.timezone, "UTC");
        assert!(prefs.quiet_hours.is_none());
    }
}
