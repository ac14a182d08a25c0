/// Routes browser lifecycle events into the scheduler and overlay controller
use std::rc::Rc;

use serde::Deserialize;

use crate::config::MonitorConfig;
use crate::error::MonitorResult;
use crate::host::{AlarmScheduler, TabSource};
use crate::inspector::matches;
use crate::overlay::OverlayController;
use crate::scheduler::EnforcementScheduler;
use crate::tab_data::{TabChange, TabId, TabSnapshot, UpdatedTab};

/// Messages other extension contexts send via chrome.runtime.sendMessage
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum RuntimeMessage {
    #[serde(rename = "updateTargetSites")]
    UpdateTargetSites,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    Startup,
    Alarm(String),
    TabActivated(TabId),
    /// Navigation reached "complete" in the active tab
    TabLoaded(TabSnapshot),
    Message(RuntimeMessage),
}

impl BrowserEvent {
    /// Only a finished load in the active tab is interesting
    pub fn from_tab_update(change: &TabChange, tab: UpdatedTab) -> Option<BrowserEvent> {
        if change.is_complete() && tab.active {
            Some(BrowserEvent::TabLoaded(tab.into()))
        } else {
            None
        }
    }
}

pub struct EventRouter {
    scheduler: EnforcementScheduler,
    overlay: OverlayController,
    tabs: Rc<dyn TabSource>,
    alarms: Rc<dyn AlarmScheduler>,
    config: MonitorConfig,
}

impl EventRouter {
    pub fn new(
        scheduler: EnforcementScheduler,
        overlay: OverlayController,
        tabs: Rc<dyn TabSource>,
        alarms: Rc<dyn AlarmScheduler>,
        config: MonitorConfig,
    ) -> Self {
        EventRouter {
            scheduler,
            overlay,
            tabs,
            alarms,
            config,
        }
    }

    /// Handle one event. Errors end here; they never reach the event pump.
    pub async fn dispatch(&self, event: BrowserEvent) {
        log::debug!("Dispatching {:?}", event);
        let result = match event {
            BrowserEvent::Startup => self.start().await,
            BrowserEvent::Alarm(name) => {
                self.on_alarm(&name).await;
                Ok(())
            }
            BrowserEvent::TabActivated(tab_id) => self.on_tab_activated(tab_id).await,
            BrowserEvent::TabLoaded(tab) => self.on_tab_loaded(tab).await,
            BrowserEvent::Message(RuntimeMessage::UpdateTargetSites) => self.reload().await,
        };

        if let Err(e) = result {
            log::error!("Event handler failed: {}", e);
        }
    }

    async fn start(&self) -> MonitorResult<()> {
        log::info!("Mindful Browse Reminder extension started.");
        self.alarms
            .create_alarm(&self.config.reminder_alarm, None, self.config.reminder_period_minutes)
            .await?;
        self.alarms
            .create_alarm(
                &self.config.enforcement_alarm,
                Some(self.config.enforcement_delay_minutes),
                self.config.enforcement_period_minutes,
            )
            .await?;

        self.reload().await?;
        self.scheduler.reminder_cycle().await;
        Ok(())
    }

    async fn on_alarm(&self, name: &str) {
        if name == self.config.reminder_alarm {
            log::debug!("Alarm fired! Checking current tab...");
            self.scheduler.reminder_cycle().await;
        } else if name == self.config.enforcement_alarm {
            self.scheduler.enforcement_cycle().await;
        } else {
            log::debug!("Ignoring unknown alarm '{}'", name);
        }
    }

    async fn on_tab_activated(&self, tab_id: TabId) -> MonitorResult<()> {
        self.scheduler.reminder_cycle().await;
        let tab = self.tabs.get_tab(tab_id).await?;
        self.refresh_overlay(&tab).await
    }

    async fn on_tab_loaded(&self, tab: TabSnapshot) -> MonitorResult<()> {
        self.scheduler.reminder_cycle().await;
        self.refresh_overlay(&tab).await
    }

    async fn refresh_overlay(&self, tab: &TabSnapshot) -> MonitorResult<()> {
        let show = matches(tab, &self.scheduler.registry().patterns());
        self.overlay.apply_overlay(tab.id, show).await
    }

    async fn reload(&self) -> MonitorResult<()> {
        log::info!("Reloading target sites from storage...");
        self.scheduler.registry().load().await?;
        Ok(())
    }
}
