/// Runtime configuration for the background monitor
use std::time::Duration;

use serde::Deserialize;

use crate::error::{MonitorError, MonitorResult};

pub const DEFAULT_SITES: [&str; 4] = ["shorts", "x.com", "instagram", "facebook"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// chrome.storage.sync key holding the pattern list
    pub storage_key: String,
    pub default_sites: Vec<String>,
    pub reminder_alarm: String,
    pub reminder_period_minutes: f64,
    pub enforcement_alarm: String,
    pub enforcement_delay_minutes: f64,
    pub enforcement_period_minutes: f64,
    pub max_close_attempts: u32,
    pub retry_backoff_ms: u64,
    pub icon_url: String,
    /// DOM id of the injected overlay node
    pub overlay_marker: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            storage_key: "targetSites".to_string(),
            default_sites: DEFAULT_SITES.iter().map(|s| s.to_string()).collect(),
            reminder_alarm: "mindfulBrowseAlarm".to_string(),
            reminder_period_minutes: 0.5,
            enforcement_alarm: "mindfulBrowseShutdown".to_string(),
            enforcement_delay_minutes: 2.0,
            enforcement_period_minutes: 2.0,
            max_close_attempts: 3,
            retry_backoff_ms: 500,
            icon_url: "icons/icon48.png".to_string(),
            overlay_marker: "mindful-browse-overlay".to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn validate(&self) -> MonitorResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(MonitorError::Config("storageKey must not be empty".to_string()));
        }
        if self.reminder_alarm.is_empty() || self.enforcement_alarm.is_empty() {
            return Err(MonitorError::Config("alarm names must not be empty".to_string()));
        }
        if self.reminder_alarm == self.enforcement_alarm {
            return Err(MonitorError::Config("alarm names must differ".to_string()));
        }
        if !(self.reminder_period_minutes > 0.0 && self.enforcement_period_minutes > 0.0) {
            return Err(MonitorError::Config("alarm periods must be positive".to_string()));
        }
        if self.enforcement_delay_minutes < 0.0 {
            return Err(MonitorError::Config("enforcementDelayMinutes must not be negative".to_string()));
        }
        if self.max_close_attempts == 0 {
            return Err(MonitorError::Config("maxCloseAttempts must be at least 1".to_string()));
        }
        if self.overlay_marker.trim().is_empty() {
            return Err(MonitorError::Config("overlayMarker must not be empty".to_string()));
        }
        Ok(())
    }
}
