/// In-memory browser host for unit tests
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::host::{
    AlarmScheduler, ChangeSignal, Delay, NotificationSink, PatternStore, ScriptInjector, TabSource,
};
use crate::notifier::{NotificationOptions, ReminderNotifier};
use crate::overlay::OverlayCommand;
use crate::registry::SiteRegistry;
use crate::scheduler::EnforcementScheduler;
use crate::tab_data::{TabId, TabSnapshot};

pub fn run<F: Future>(future: F) -> F::Output {
    futures::executor::block_on(future)
}

pub fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn registry(host: &Rc<FakeHost>) -> Rc<SiteRegistry> {
    let config = MonitorConfig::default();
    Rc::new(SiteRegistry::new(
        host.clone(),
        host.clone(),
        &config.storage_key,
        &config.default_sites,
    ))
}

pub fn scheduler(host: &Rc<FakeHost>) -> EnforcementScheduler {
    let config = MonitorConfig::default();
    let notifier = ReminderNotifier::new(host.clone(), &config.icon_url);
    EnforcementScheduler::new(registry(host), host.clone(), notifier, host.clone(), config)
}

#[derive(Default)]
pub struct FakeHost {
    tabs: RefCell<HashMap<TabId, TabSnapshot>>,
    active: Cell<Option<TabId>>,
    gone_on_lookup: RefCell<HashSet<TabId>>,
    lookups_fail: Cell<bool>,
    close_failures_left: Cell<u32>,
    close_failures_seen: Cell<u32>,
    navigate_after: RefCell<Option<(u32, String)>>,
    lookups_fail_after: Cell<Option<u32>>,
    reload_during_backoff: RefCell<Option<(Vec<String>, Rc<SiteRegistry>)>>,
    close_attempts: RefCell<Vec<TabId>>,
    notifications: RefCell<Vec<NotificationOptions>>,
    notifications_fail: Cell<bool>,
    pages: RefCell<HashMap<TabId, Vec<String>>>,
    injections: RefCell<Vec<(TabId, OverlayCommand)>>,
    injection_fails: Cell<bool>,
    sleeps: RefCell<Vec<Duration>>,
    alarms: RefCell<Vec<(String, Option<f64>, f64)>>,
    stored: RefCell<Option<Vec<String>>>,
    reads_fail: Cell<bool>,
    writes_fail: Cell<bool>,
    writes: Cell<usize>,
    change_signals: Cell<usize>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_tab(&self, id: TabId, url: &str) {
        self.tabs.borrow_mut().insert(id, TabSnapshot::new(id, url));
    }

    pub fn open_active_tab(&self, id: TabId, url: &str) {
        self.open_tab(id, url);
        self.active.set(Some(id));
    }

    pub fn navigate(&self, id: TabId, url: &str) {
        if let Some(tab) = self.tabs.borrow_mut().get_mut(&id) {
            tab.url = Some(url.to_string());
        }
    }

    pub fn set_stored(&self, patterns: &[&str]) {
        *self.stored.borrow_mut() = Some(strings(patterns));
    }

    pub fn stored(&self) -> Option<Vec<String>> {
        self.stored.borrow().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn change_signals(&self) -> usize {
        self.change_signals.get()
    }

    pub fn fail_reads(&self) {
        self.reads_fail.set(true);
    }

    pub fn fail_writes(&self) {
        self.writes_fail.set(true);
    }

    /// The next `count` close calls are rejected
    pub fn fail_closes(&self, count: u32) {
        self.close_failures_left.set(count);
    }

    /// Simulate the user navigating away once `failures` closes have been rejected
    pub fn navigate_after_close_failures(&self, failures: u32, url: &str) {
        *self.navigate_after.borrow_mut() = Some((failures, url.to_string()));
    }

    /// The active tab is reported, but any fresh lookup says it is gone
    pub fn close_before_recheck(&self, id: TabId) {
        self.gone_on_lookup.borrow_mut().insert(id);
    }

    pub fn fail_tab_lookups(&self) {
        self.lookups_fail.set(true);
    }

    /// Fresh lookups start failing once `failures` closes have been rejected
    pub fn fail_lookups_after_close_failures(&self, failures: u32) {
        self.lookups_fail_after.set(Some(failures));
    }

    /// The next backoff sleep stores `patterns` and reloads `registry`,
    /// as an `updateTargetSites` message landing mid-retry would
    pub fn reload_during_backoff(&self, patterns: &[&str], registry: Rc<SiteRegistry>) {
        *self.reload_during_backoff.borrow_mut() = Some((strings(patterns), registry));
    }

    pub fn fail_notifications(&self) {
        self.notifications_fail.set(true);
    }

    pub fn fail_injection(&self) {
        self.injection_fails.set(true);
    }

    pub fn notifications(&self) -> Vec<NotificationOptions> {
        self.notifications.borrow().clone()
    }

    pub fn close_attempts(&self) -> Vec<TabId> {
        self.close_attempts.borrow().clone()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn alarms(&self) -> Vec<(String, Option<f64>, f64)> {
        self.alarms.borrow().clone()
    }

    pub fn injections(&self) -> Vec<(TabId, OverlayCommand)> {
        self.injections.borrow().clone()
    }

    /// Overlay marker nodes currently present in a tab's page
    pub fn overlay_nodes(&self, id: TabId) -> Vec<String> {
        self.pages.borrow().get(&id).cloned().unwrap_or_default()
    }
}

#[async_trait(?Send)]
impl TabSource for FakeHost {
    async fn active_tab(&self) -> MonitorResult<Option<TabSnapshot>> {
        Ok(self
            .active
            .get()
            .and_then(|id| self.tabs.borrow().get(&id).cloned()))
    }

    async fn get_tab(&self, tab_id: TabId) -> MonitorResult<TabSnapshot> {
        if self.lookups_fail.get() {
            return Err(MonitorError::Unexpected("tabs.get rejected".to_string()));
        }
        if self.gone_on_lookup.borrow().contains(&tab_id) {
            return Err(MonitorError::TabGone { tab_id });
        }
        self.tabs
            .borrow()
            .get(&tab_id)
            .cloned()
            .ok_or(MonitorError::TabGone { tab_id })
    }

    async fn close_tab(&self, tab_id: TabId) -> MonitorResult<()> {
        self.close_attempts.borrow_mut().push(tab_id);

        let left = self.close_failures_left.get();
        if left > 0 {
            self.close_failures_left.set(left - 1);
            let seen = self.close_failures_seen.get() + 1;
            self.close_failures_seen.set(seen);

            let navigation = self.navigate_after.borrow().clone();
            if let Some((after, url)) = navigation {
                if after == seen {
                    self.navigate(tab_id, &url);
                }
            }
            if self.lookups_fail_after.get() == Some(seen) {
                self.lookups_fail.set(true);
            }
            return Err(MonitorError::TabClose {
                tab_id,
                reason: "Tabs cannot be edited right now".to_string(),
            });
        }

        self.tabs.borrow_mut().remove(&tab_id);
        if self.active.get() == Some(tab_id) {
            self.active.set(None);
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl NotificationSink for FakeHost {
    async fn create(&self, options: &NotificationOptions) -> MonitorResult<()> {
        if self.notifications_fail.get() {
            return Err(MonitorError::Notification("permission denied".to_string()));
        }
        self.notifications.borrow_mut().push(options.clone());
        Ok(())
    }
}

#[async_trait(?Send)]
impl ScriptInjector for FakeHost {
    async fn inject(&self, tab_id: TabId, command: &OverlayCommand) -> MonitorResult<()> {
        if self.injection_fails.get() {
            return Err(MonitorError::Injection {
                tab_id,
                reason: "Cannot access a chrome:// URL".to_string(),
            });
        }
        self.injections.borrow_mut().push((tab_id, command.clone()));

        // Same lookup-by-marker semantics as the page routine
        let mut pages = self.pages.borrow_mut();
        let nodes = pages.entry(tab_id).or_default();
        let present = nodes.iter().any(|id| *id == command.marker_id);
        if command.show && !present {
            nodes.push(command.marker_id.clone());
        } else if !command.show && present {
            nodes.retain(|id| *id != command.marker_id);
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl Delay for FakeHost {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);

        let reload = self.reload_during_backoff.borrow_mut().take();
        if let Some((patterns, registry)) = reload {
            *self.stored.borrow_mut() = Some(patterns);
            if let Err(e) = registry.load().await {
                panic!("reload during backoff failed: {}", e);
            }
        }
    }
}

#[async_trait(?Send)]
impl AlarmScheduler for FakeHost {
    async fn create_alarm(
        &self,
        name: &str,
        delay_minutes: Option<f64>,
        period_minutes: f64,
    ) -> MonitorResult<()> {
        self.alarms
            .borrow_mut()
            .push((name.to_string(), delay_minutes, period_minutes));
        Ok(())
    }
}

#[async_trait(?Send)]
impl PatternStore for FakeHost {
    async fn read(&self, _key: &str) -> MonitorResult<Option<Vec<String>>> {
        if self.reads_fail.get() {
            return Err(MonitorError::RegistryRead("storage unavailable".to_string()));
        }
        Ok(self.stored.borrow().clone())
    }

    async fn write(&self, _key: &str, patterns: &[String]) -> MonitorResult<()> {
        if self.writes_fail.get() {
            return Err(MonitorError::RegistryWrite("QUOTA_BYTES_PER_ITEM exceeded".to_string()));
        }
        self.writes.set(self.writes.get() + 1);
        *self.stored.borrow_mut() = Some(patterns.to_vec());
        Ok(())
    }
}

#[async_trait(?Send)]
impl ChangeSignal for FakeHost {
    async fn registry_changed(&self) -> MonitorResult<()> {
        self.change_signals.set(self.change_signals.get() + 1);
        Ok(())
    }
}
