/// Error types for the tab monitor

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

use crate::tab_data::TabId;

pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonitorError {
    /// Storage could not be read. Distinct from "key absent", which seeds defaults.
    #[error("Failed to read target sites: {0}")]
    RegistryRead(String),

    #[error("Failed to save target sites: {0}")]
    RegistryWrite(String),

    /// The tab id no longer resolves (closed or discarded mid-cycle)
    #[error("Tab {tab_id} is gone")]
    TabGone { tab_id: TabId },

    #[error("Failed to close tab {tab_id}: {reason}")]
    TabClose { tab_id: TabId, reason: String },

    #[error("Failed to create notification: {0}")]
    Notification(String),

    #[error("Failed to inject overlay into tab {tab_id}: {reason}")]
    Injection { tab_id: TabId, reason: String },

    #[error("Failed to schedule alarm '{name}': {reason}")]
    Alarm { name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Unexpected(String),
}

/// Errors raised while editing the site list from the options popup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SiteListError {
    #[error("Please enter a word or domain.")]
    Empty,

    #[error("'{0}' is already in the list.")]
    Duplicate(String),
}

/// Message text of a bridge rejection. chrome.* APIs reject with `Error` objects.
pub fn describe_js(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
