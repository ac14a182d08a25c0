/// Capabilities the browser host provides to the monitor.
///
/// The core never talks to chrome.* directly. Everything it needs from the
/// browser goes through one of these traits, which `ChromeHost` implements
/// over the JS bridge and tests implement in memory.
use std::time::Duration;

use async_trait::async_trait;

use crate::error::MonitorResult;
use crate::notifier::NotificationOptions;
use crate::overlay::OverlayCommand;
use crate::tab_data::{TabId, TabSnapshot};

#[async_trait(?Send)]
pub trait TabSource {
    /// Active tab in the currently focused window, if any
    async fn active_tab(&self) -> MonitorResult<Option<TabSnapshot>>;

    /// Fresh view of one tab; `MonitorError::TabGone` when the id no longer resolves
    async fn get_tab(&self, tab_id: TabId) -> MonitorResult<TabSnapshot>;

    async fn close_tab(&self, tab_id: TabId) -> MonitorResult<()>;
}

#[async_trait(?Send)]
pub trait NotificationSink {
    async fn create(&self, options: &NotificationOptions) -> MonitorResult<()>;
}

/// Runs the self-contained overlay routine inside a tab's page
#[async_trait(?Send)]
pub trait ScriptInjector {
    async fn inject(&self, tab_id: TabId, command: &OverlayCommand) -> MonitorResult<()>;
}

/// Cooperative delay; yields to the event loop instead of blocking
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

#[async_trait(?Send)]
pub trait AlarmScheduler {
    async fn create_alarm(
        &self,
        name: &str,
        delay_minutes: Option<f64>,
        period_minutes: f64,
    ) -> MonitorResult<()>;
}

/// Durable storage for the pattern list
#[async_trait(?Send)]
pub trait PatternStore {
    /// `Ok(None)` when the key has never been written
    async fn read(&self, key: &str) -> MonitorResult<Option<Vec<String>>>;

    async fn write(&self, key: &str, patterns: &[String]) -> MonitorResult<()>;
}

/// Tells other extension contexts that the stored list changed
#[async_trait(?Send)]
pub trait ChangeSignal {
    async fn registry_changed(&self) -> MonitorResult<()>;
}
