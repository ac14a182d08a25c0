/// Reminder and enforcement notifications
use std::rc::Rc;

use serde::Serialize;

use crate::host::NotificationSink;

/// chrome.notifications priority 2 ("high")
const HIGH_PRIORITY: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Periodic nag while on a target site
    Reminder { url: String },
    /// Enforcement closed the tab
    Closed { url: String },
    /// Enforcement gave up after every attempt failed
    Failed { url: String, attempts: u32 },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Reminder { .. } => "Mindful Browse Check-in",
            Notice::Closed { .. } => "SOS Initiated",
            Notice::Failed { .. } => "SOS Failed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Reminder { url } => format!(
                "You're currently on a site that might be distracting ({}). Do you really want to be here?",
                url
            ),
            Notice::Closed { url } => format!(
                "The tab was taking too much of your time ({}). I took the liberty to kill it...",
                url
            ),
            Notice::Failed { url, attempts } => format!(
                "Tried to close the tab ({}) but failed after {} attempts.",
                url, attempts
            ),
        }
    }
}

/// Options object handed to chrome.notifications.create
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub icon_url: String,
    pub title: String,
    pub message: String,
    pub priority: i32,
}

impl NotificationOptions {
    pub fn basic(notice: &Notice, icon_url: &str) -> Self {
        NotificationOptions {
            kind: "basic".to_string(),
            icon_url: icon_url.to_string(),
            title: notice.title().to_string(),
            message: notice.message(),
            priority: HIGH_PRIORITY,
        }
    }
}

/// Fire-and-forget notifications. No acknowledgment, no deduplication.
#[derive(Clone)]
pub struct ReminderNotifier {
    sink: Rc<dyn NotificationSink>,
    icon_url: String,
}

impl ReminderNotifier {
    pub fn new(sink: Rc<dyn NotificationSink>, icon_url: &str) -> Self {
        ReminderNotifier {
            sink,
            icon_url: icon_url.to_string(),
        }
    }

    pub async fn notify(&self, notice: Notice) {
        let options = NotificationOptions::basic(&notice, &self.icon_url);
        if let Err(e) = self.sink.create(&options).await {
            log::warn!("Notification '{}' was not shown: {}", options.title, e);
        }
    }

    pub async fn remind(&self, url: &str) {
        self.notify(Notice::Reminder {
            url: url.to_string(),
        })
        .await;
    }
}
