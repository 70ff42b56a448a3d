use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tokio::{
    signal,
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

use crate::{config::PanelConfig, panel::Panel};

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Background refresh for a panel: the statistics poller and the uptime ticker.
pub struct Pollers {
    shutdown_tx: watch::Sender<()>,
    statistics: JoinHandle<()>,
    uptimes: JoinHandle<()>,
}

impl Pollers {
    /// Starts both tickers. Statistics are fetched immediately, then on every interval.
    pub fn spawn(panel: Arc<Panel>, config: &PanelConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let statistics = tokio::spawn(poll_statistics(
            panel.clone(),
            config.statistics_interval(),
            shutdown_rx.clone(),
        ));
        let uptimes = tokio::spawn(refresh_uptimes(panel, config.uptime_interval(), shutdown_rx));
        Self {
            shutdown_tx,
            statistics,
            uptimes,
        }
    }

    pub async fn shutdown(self) -> Result<()> {
        self.shutdown_tx.send(()).ok();
        self.statistics.await?;
        self.uptimes.await?;
        Ok(())
    }
}

async fn poll_statistics(panel: Arc<Panel>, every: Duration, mut shutdown: watch::Receiver<()>) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                // Failures are already rendered and logged by the panel. A hung
                // request must not hold up shutdown.
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = panel.fetch_disk_statistics() => {}
                }
            }
        }
    }
    tracing::debug!("statistics poller stopped");
}

async fn refresh_uptimes(panel: Arc<Panel>, every: Duration, mut shutdown: watch::Receiver<()>) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                panel.update_uptimes_display(now_millis());
            }
        }
    }
    tracing::debug!("uptime ticker stopped");
}

/// Headless mode: keeps the panel refreshed and logs what a screen would show
/// until Ctrl-C.
pub async fn run_watch(panel: Arc<Panel>, config: PanelConfig) -> Result<()> {
    let pollers = Pollers::spawn(panel.clone(), &config);
    let mut heartbeat = interval(config.statistics_interval());
    let panel_name = config.panel_name.clone();

    tracing::info!(
        panel = %panel_name,
        url = %config.base_url,
        every_secs = config.statistics_interval_seconds,
        "watching recorder"
    );

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                tracing::info!(panel = %panel_name, "ctrl-c received, stopping");
                break;
            }
            _ = heartbeat.tick() => {
                let view = panel.snapshot();
                tracing::info!(
                    panel = %panel_name,
                    disk = %view.disk_stats.lines().join(", "),
                    server_uptime = %view.server_uptime,
                    recording_uptime = %view.recording_uptime,
                    recording = %view.recording_indicator,
                    "recorder status"
                );
            }
        }
    }

    pollers.shutdown().await
}
