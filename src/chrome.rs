/// Host capabilities backed by the chrome.* extension APIs
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{describe_js, MonitorError, MonitorResult};
use crate::host::{
    AlarmScheduler, ChangeSignal, Delay, NotificationSink, PatternStore, ScriptInjector, TabSource,
};
use crate::notifier::NotificationOptions;
use crate::overlay::OverlayCommand;
use crate::tab_data::{TabId, TabSnapshot};

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTab(tab_id: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createNotification(options: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn applyOverlay(tab_id: i32, command: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn sleep(ms: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createAlarm(name: &str, delay_minutes: Option<f64>, period_minutes: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<(), JsValue>;
}

/// chrome.tabs.get rejects with "No tab with id: N." once a tab is closed
const NO_TAB_PREFIX: &str = "No tab with id";

/// A closed tab is `TabGone`; anything else from tabs.get is unexpected
pub fn classify_get_tab_error(tab_id: TabId, reason: &str) -> MonitorError {
    if reason.starts_with(NO_TAB_PREFIX) {
        MonitorError::TabGone { tab_id }
    } else {
        MonitorError::Unexpected(format!("Failed to get tab {}: {}", tab_id, reason))
    }
}

#[derive(Serialize)]
struct UpdateTargetSites {
    action: &'static str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeHost;

impl ChromeHost {
    pub fn new() -> Self {
        ChromeHost
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, String> {
    serde_wasm_bindgen::to_value(value).map_err(|e| format!("Failed to serialize: {:?}", e))
}

fn parse_tab(tab_js: JsValue) -> MonitorResult<Option<TabSnapshot>> {
    if tab_js.is_null() || tab_js.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(tab_js)
        .map(Some)
        .map_err(|e| MonitorError::Unexpected(format!("Failed to parse tab: {:?}", e)))
}

#[async_trait(?Send)]
impl TabSource for ChromeHost {
    async fn active_tab(&self) -> MonitorResult<Option<TabSnapshot>> {
        let tab_js = queryActiveTab()
            .await
            .map_err(|e| MonitorError::Unexpected(format!("Failed to query tabs: {}", describe_js(&e))))?;
        parse_tab(tab_js)
    }

    async fn get_tab(&self, tab_id: TabId) -> MonitorResult<TabSnapshot> {
        match getTab(tab_id).await {
            Ok(tab_js) => parse_tab(tab_js)?.ok_or(MonitorError::TabGone { tab_id }),
            Err(e) => Err(classify_get_tab_error(tab_id, &describe_js(&e))),
        }
    }

    async fn close_tab(&self, tab_id: TabId) -> MonitorResult<()> {
        removeTab(tab_id).await.map_err(|e| MonitorError::TabClose {
            tab_id,
            reason: describe_js(&e),
        })
    }
}

#[async_trait(?Send)]
impl NotificationSink for ChromeHost {
    async fn create(&self, options: &NotificationOptions) -> MonitorResult<()> {
        let options_js = to_js(options).map_err(MonitorError::Notification)?;
        createNotification(options_js)
            .await
            .map_err(|e| MonitorError::Notification(describe_js(&e)))
    }
}

#[async_trait(?Send)]
impl ScriptInjector for ChromeHost {
    async fn inject(&self, tab_id: TabId, command: &OverlayCommand) -> MonitorResult<()> {
        let command_js = to_js(command).map_err(|reason| MonitorError::Injection { tab_id, reason })?;
        applyOverlay(tab_id, command_js)
            .await
            .map_err(|e| MonitorError::Injection {
                tab_id,
                reason: describe_js(&e),
            })
    }
}

#[async_trait(?Send)]
impl Delay for ChromeHost {
    async fn sleep(&self, duration: Duration) {
        let ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        if let Err(e) = sleep(ms).await {
            log::warn!("Timer failed: {}", describe_js(&e));
        }
    }
}

#[async_trait(?Send)]
impl AlarmScheduler for ChromeHost {
    async fn create_alarm(
        &self,
        name: &str,
        delay_minutes: Option<f64>,
        period_minutes: f64,
    ) -> MonitorResult<()> {
        createAlarm(name, delay_minutes, period_minutes)
            .await
            .map_err(|e| MonitorError::Alarm {
                name: name.to_string(),
                reason: describe_js(&e),
            })
    }
}

#[async_trait(?Send)]
impl PatternStore for ChromeHost {
    async fn read(&self, key: &str) -> MonitorResult<Option<Vec<String>>> {
        let stored_js = getStorage(key)
            .await
            .map_err(|e| MonitorError::RegistryRead(describe_js(&e)))?;

        if stored_js.is_null() || stored_js.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(stored_js)
            .map(Some)
            .map_err(|e| MonitorError::RegistryRead(format!("Failed to parse storage: {:?}", e)))
    }

    async fn write(&self, key: &str, patterns: &[String]) -> MonitorResult<()> {
        let patterns_js = to_js(patterns).map_err(MonitorError::RegistryWrite)?;
        setStorage(key, patterns_js)
            .await
            .map_err(|e| MonitorError::RegistryWrite(describe_js(&e)))
    }
}

#[async_trait(?Send)]
impl ChangeSignal for ChromeHost {
    async fn registry_changed(&self) -> MonitorResult<()> {
        let message = to_js(&UpdateTargetSites {
            action: "updateTargetSites",
        })
        .map_err(MonitorError::Unexpected)?;
        sendRuntimeMessage(message)
            .await
            .map_err(|e| MonitorError::Unexpected(format!("Failed to send update message: {}", describe_js(&e))))
    }
}
