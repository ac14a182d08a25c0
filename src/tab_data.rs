/// Data structures for browser tabs as seen by the monitor
use serde::{Deserialize, Serialize};

pub type TabId = i32;

/// Point-in-time view of a tab. Re-fetched on every check, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    #[serde(default)]
    pub url: Option<String>,
}

impl TabSnapshot {
    pub fn new(id: TabId, url: &str) -> TabSnapshot {
        TabSnapshot {
            id,
            url: Some(url.to_string()),
        }
    }

    /// URL as shown in notifications; empty when the tab has none yet
    pub fn display_url(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }
}

/// Subset of chrome.tabs.onUpdated's changeInfo the router cares about
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TabChange {
    #[serde(default)]
    pub status: Option<String>,
}

impl TabChange {
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }
}

/// Tab object delivered alongside onUpdated
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdatedTab {
    pub id: TabId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl From<UpdatedTab> for TabSnapshot {
    fn from(tab: UpdatedTab) -> TabSnapshot {
        TabSnapshot {
            id: tab.id,
            url: tab.url,
        }
    }
}
