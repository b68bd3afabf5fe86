use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::alerts::{AlertConfig, DevicePreferences};
use crate::narrator::NarratorConfig;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const SETTINGS_PATH_ENV: &str = "HELIOSINGER_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "heliosinger.json";

/// Driver cadence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedConfig {
    /// Seconds between readings pulled from the feed.
    pub reading_interval_secs: u64,
    /// Narrator tick, in milliseconds.
    pub tick_millis: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            reading_interval_secs: 5,
            tick_millis: 1000,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_millis == 0 {
            bail!("Invalid tick interval 0 ms");
        }
        if self.reading_interval_secs == 0 {
            bail!("Invalid reading interval 0 s");
        }
        if self.reading_interval_secs.saturating_mul(1000) < self.tick_millis {
            bail!(
                "Reading interval {} s is shorter than the {} ms tick",
                self.reading_interval_secs,
                self.tick_millis
            );
        }
        Ok(())
    }

    /// How many ticks pass between readings.
    pub fn ticks_per_reading(&self) -> u64 {
        (self.reading_interval_secs.saturating_mul(1000) / self.tick_millis.max(1)).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub narrator: NarratorConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub device: DevicePreferences,
    #[serde(default)]
    pub feed: FeedConfig,
}

impl AppSettings {
    pub fn validate(&self) -> Result<()> {
        self.narrator.validate().context("narrator settings")?;
        self.alerts.validate().context("alert settings")?;
        self.device.validate().context("device preferences")?;
        self.feed.validate().context("feed settings")?;
        Ok(())
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    /// Path from `HELIOSINGER_SETTINGS`, or `heliosinger.json` in the working directory.
    pub fn default_path() -> PathBuf {
        env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<AppSettings>(&contents) {
                Ok(parsed) => parsed,
                Err(err) => {
                    log_warn!(
                        "Ignoring unparseable settings in {}: {}",
                        path.display(),
                        err
                    );
                    AppSettings::default()
                }
            }
        } else {
            AppSettings::default()
        };

        data.validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> AppSettings {
        self.read().clone()
    }

    pub fn narrator(&self) -> NarratorConfig {
        self.read().narrator
    }

    pub fn alerts(&self) -> AlertConfig {
        self.read().alerts
    }

    pub fn device(&self) -> DevicePreferences {
        self.read().device.clone()
    }

    pub fn feed(&self) -> FeedConfig {
        self.read().feed
    }

    pub fn update_narrator(&self, settings: NarratorConfig) -> Result<()> {
        settings.validate()?;
        self.update(|data| data.narrator = settings)
    }

    pub fn update_alerts(&self, settings: AlertConfig) -> Result<()> {
        self.update(|data| data.alerts = settings)
    }

    pub fn update_device(&self, settings: DevicePreferences) -> Result<()> {
        settings.validate()?;
        self.update(|data| data.device = settings)
    }

    pub fn update_feed(&self, settings: FeedConfig) -> Result<()> {
        settings.validate()?;
        self.update(|data| data.feed = settings)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        data.validate()?;
        *self.write() = data;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut AppSettings)) -> Result<()> {
        let mut guard = self.write();
        let mut next = guard.clone();
        apply(&mut next);
        next.validate()?;
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AppSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::QuietHours;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        env::temp_dir().join(format!("heliosinger-settings-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = scratch_path();
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.alerts().min_interval_minutes, 5);
        assert_eq!(store.feed().reading_interval_secs, 5);
        assert_eq!(store.feed().ticks_per_reading(), 5);
        assert!(store.device().alerts_enabled);
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let path = scratch_path();
        fs::write(&path, "not json {").unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.narrator(), NarratorConfig::default());
        fs::remove_file(path).ok();
    }

    #[test]
    fn parsed_but_invalid_file_is_an_error() {
        let path = scratch_path();
        fs::write(&path, r#"{"feed": {"readingIntervalSecs": 0, "tickMillis": 1000}}"#).unwrap();
        assert!(SettingsStore::new(path.clone()).is_err());
        fs::remove_file(path).ok();
    }

    #[test]
    fn oversized_alert_interval_is_rejected() {
        let path = scratch_path();
        fs::write(&path, r#"{"alerts": {"minIntervalMinutes": 4611686018427387903}}"#).unwrap();
        assert!(SettingsStore::new(path.clone()).is_err());
        fs::remove_file(path).ok();
    }

    #[test]
    fn huge_reading_interval_saturates() {
        let feed = FeedConfig {
            reading_interval_secs: u64::MAX,
            tick_millis: 1000,
        };
        assert!(feed.validate().is_ok());
        assert_eq!(feed.ticks_per_reading(), u64::MAX / 1000);
    }

    #[test]
    fn updates_persist_and_reload() {
        let path = scratch_path();
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut device = store.device();
        device.quiet_hours = Some(QuietHours {
            start_hour: 22,
            end_hour: 7,
        });
        device.timezone = "Europe/Berlin".into();
        store.update_device(device.clone()).unwrap();

        let reopened = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(reopened.device(), device);

        // Edit the file behind the store's back, then reload.
        let mut on_disk = reopened.snapshot();
        on_disk.alerts.min_interval_minutes = 15;
        fs::write(&path, serde_json::to_string_pretty(&on_disk).unwrap()).unwrap();
        store.reload().unwrap();
        assert_eq!(store.alerts().min_interval_minutes, 15);

        fs::remove_file(path).ok();
    }

    #[test]
    fn rejected_update_leaves_file_untouched() {
        let path = scratch_path();
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut device = store.device();
        device.timezone = "Atlantis/Capital".into();
        assert!(store.update_device(device).is_err());
        assert!(!path.exists());
        assert_eq!(store.device().timezone, "UTC");
    }
}
