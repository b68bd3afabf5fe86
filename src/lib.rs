pub mod alerts;
pub mod changes;
pub mod chord;
pub mod classifier;
pub mod constants;
pub mod driver;
pub mod models;
pub mod narrator;
pub mod settings;
pub mod simulation;
pub mod utils;

use anyhow::Context;
use settings::SettingsStore;
use tokio_util::sync::CancellationToken;

pub use alerts::{evaluate_alert_events, is_within_quiet_hours};
pub use changes::{detect_changes, detect_shock};
pub use chord::map_chord;
pub use classifier::classify;
pub use models::{Condition, SpaceWeatherReading};
pub use narrator::{get_current_insight, get_insight_progress, update_narrator, NarratorState};

pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Heliosinger starting up...");

    if let Err(err) = run_inner() {
        log::error!("Heliosinger stopped: {err:?}");
        std::process::exit(1);
    }
}

fn run_inner() -> anyhow::Result<()> {
    let settings_path = SettingsStore::default_path();
    let store = SettingsStore::new(settings_path.clone())
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    let settings = store.snapshot();

    log::info!(
        "alerts {} for device {} (tz {})",
        if settings.device.alerts_enabled { "enabled" } else { "disabled" },
        settings.device.install_id,
        settings.device.timezone
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(async move {
        let cancel_token = CancellationToken::new();
        driver::spawn_ctrl_c_handler(cancel_token.clone());
        driver::feed_loop(settings, cancel_token).await
    })
}
