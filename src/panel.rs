use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use crate::{
    api::{ControlApi, RecordAction},
    error::PanelError,
    stats::{DiskStatsView, UptimeState, UptimeView},
};

const INVALID_DAYS_MESSAGE: &str = "Status: Please enter a valid number of days (0 or more).";

/// An on-screen trigger that is disabled while its request is in flight.
#[derive(Debug)]
pub struct Control {
    enabled: AtomicBool,
}

impl Control {
    fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Disables the control until the returned guard drops. `None` when it is
    /// already disabled.
    fn engage(&self) -> Option<ControlGuard<'_>> {
        self.enabled
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ControlGuard { control: self })
    }
}

/// Re-enables its control on drop: after success, failure, cancellation or unwind.
struct ControlGuard<'a> {
    control: &'a Control,
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        self.control.enabled.store(true, Ordering::Release);
    }
}

/// Text regions of the control panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    /// Feedback from the last start/stop command.
    pub recording_status: String,
    /// Recording state derived from the last statistics fetch.
    pub recording_indicator: String,
    pub cleanup_status: String,
    pub disk_stats: DiskStatsView,
    pub server_uptime: String,
    pub recording_uptime: String,
}

impl Default for PanelView {
    fn default() -> Self {
        Self {
            recording_status: "Status: Ready".to_string(),
            recording_indicator: "Status: Idle".to_string(),
            cleanup_status: "Status: Ready".to_string(),
            disk_stats: DiskStatsView::Pending,
            server_uptime: "Loading...".to_string(),
            recording_uptime: "Idle".to_string(),
        }
    }
}

/// The control panel component: dispatches commands, polls statistics and
/// derives the uptime display. Frontends read [`Panel::snapshot`].
pub struct Panel {
    api: Arc<dyn ControlApi>,
    view: Mutex<PanelView>,
    uptime: Mutex<UptimeState>,
    record_control: Control,
    delete_control: Control,
}

impl Panel {
    pub fn new(api: Arc<dyn ControlApi>) -> Self {
        Self {
            api,
            view: Mutex::new(PanelView::default()),
            uptime: Mutex::new(UptimeState::default()),
            record_control: Control::new(),
            delete_control: Control::new(),
        }
    }

    pub fn snapshot(&self) -> PanelView {
        self.view().clone()
    }

    pub fn uptime_state(&self) -> UptimeState {
        *self.uptime.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_enabled(&self) -> bool {
        self.record_control.is_enabled()
    }

    pub fn delete_enabled(&self) -> bool {
        self.delete_control.is_enabled()
    }

    fn view(&self) -> MutexGuard<'_, PanelView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends `start` or `stop` to the recorder and shows the reply.
    ///
    /// Start and stop share one control; a click while either is in flight is
    /// ignored.
    pub async fn send_action(&self, action: RecordAction) -> Result<(), PanelError> {
        let Some(_guard) = self.record_control.engage() else {
            tracing::warn!(action = %action, "record command already in flight, ignoring");
            return Ok(());
        };

        self.view().recording_status = format!("Status: Sending '{action}' command...");

        match self.api.record(action).await {
            Ok(reply) => {
                tracing::info!(action = %action, reply = %reply, "record command accepted");
                self.view().recording_status = format!("Status: {reply}");
                Ok(())
            }
            Err(err) => {
                tracing::error!(action = %action, error = %err, "record command failed");
                self.view().recording_status = status_line(&err);
                Err(err)
            }
        }
    }

    /// Asks the recorder to delete recordings older than `days_input` days.
    ///
    /// The input is validated before anything is sent. The delete control stays
    /// disabled for the duration of the request.
    pub async fn send_delete_command(&self, days_input: &str) -> Result<(), PanelError> {
        let Some(days) = parse_days(days_input) else {
            tracing::warn!(input = %days_input, "rejected day count");
            self.view().cleanup_status = INVALID_DAYS_MESSAGE.to_string();
            return Err(PanelError::InvalidDays(days_input.to_string()));
        };

        let Some(_guard) = self.delete_control.engage() else {
            tracing::warn!(days, "delete command already in flight, ignoring");
            return Ok(());
        };

        self.view().cleanup_status = format!("Status: Deleting files older than {days} days...");

        match self.api.delete_older_than(days).await {
            Ok(reply) => {
                tracing::info!(days, reply = %reply, "cleanup completed");
                self.view().cleanup_status = format!("Status: {reply}");
                Ok(())
            }
            Err(err) => {
                tracing::error!(days, error = %err, "cleanup failed");
                self.view().cleanup_status = status_line(&err);
                Err(err)
            }
        }
    }

    /// Refreshes the disk table and the start times behind the uptime display.
    pub async fn fetch_disk_statistics(&self) -> Result<UptimeState, PanelError> {
        match self.api.statistics().await {
            Ok(stats) => {
                let uptime = UptimeState::from_stats(&stats);
                self.view().disk_stats = DiskStatsView::Table(stats.rows());
                *self.uptime.lock().unwrap_or_else(PoisonError::into_inner) = uptime;
                tracing::debug!(
                    total = stats.total_space,
                    free = stats.free_space,
                    used = %stats.used_space(),
                    "statistics refreshed"
                );
                Ok(uptime)
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching disk statistics");
                self.view().disk_stats = DiskStatsView::error(&err);
                Err(err)
            }
        }
    }

    /// Recomputes both uptimes against `now_millis` (epoch milliseconds).
    pub fn update_uptimes_display(&self, now_millis: i64) -> UptimeView {
        let rendered = self.uptime_state().render(now_millis);
        let mut view = self.view();
        view.server_uptime = rendered.server_uptime.clone();
        view.recording_uptime = rendered.recording_uptime.clone();
        view.recording_indicator = if rendered.recording {
            "Status: Recording".to_string()
        } else {
            "Status: Idle".to_string()
        };
        rendered
    }
}

/// Accepts a non-negative whole number of days, ignoring surrounding whitespace.
pub fn parse_days(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    if trimmed.starts_with('+') {
        return None;
    }
    trimmed.parse().ok()
}

fn status_line(err: &PanelError) -> String {
    match err {
        PanelError::Http { status, body } => format!("Status: Error ({status}) - {body}"),
        PanelError::Network(message) => format!("Status: Network Error - {message}"),
        other => format!("Status: Error - {other}"),
    }
}
