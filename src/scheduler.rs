/// Reminder and enforcement cycles driven by the two periodic alarms.
///
/// Cycles are independent cooperative tasks. They may overlap (a reminder
/// can fire while an enforcement retry is backing off); each one works from
/// its own freshly fetched tab snapshot, and errors stop at the cycle
/// boundary so the next alarm always runs.
use std::rc::Rc;

use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::host::{Delay, TabSource};
use crate::inspector::matches;
use crate::notifier::{Notice, ReminderNotifier};
use crate::registry::SiteRegistry;
use crate::tab_data::{TabId, TabSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum ReminderOutcome {
    NoActiveTab,
    NotMatched,
    Reminded(TabSnapshot),
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnforcementOutcome {
    NoActiveTab,
    NotMatched,
    /// Freshness re-check found the tab gone or no longer matching
    Resolved { attempts: u32 },
    Closed { attempts: u32 },
    Exhausted { attempts: u32 },
    Errored(String),
}

pub struct EnforcementScheduler {
    registry: Rc<SiteRegistry>,
    tabs: Rc<dyn TabSource>,
    notifier: ReminderNotifier,
    delay: Rc<dyn Delay>,
    config: MonitorConfig,
}

impl EnforcementScheduler {
    pub fn new(
        registry: Rc<SiteRegistry>,
        tabs: Rc<dyn TabSource>,
        notifier: ReminderNotifier,
        delay: Rc<dyn Delay>,
        config: MonitorConfig,
    ) -> Self {
        EnforcementScheduler {
            registry,
            tabs,
            notifier,
            delay,
            config,
        }
    }

    pub fn registry(&self) -> &Rc<SiteRegistry> {
        &self.registry
    }

    /// Short-interval check: notify only, never close
    pub async fn reminder_cycle(&self) -> ReminderOutcome {
        match self.check_and_remind().await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Error in reminder check: {}", e);
                ReminderOutcome::Errored(e.to_string())
            }
        }
    }

    async fn check_and_remind(&self) -> MonitorResult<ReminderOutcome> {
        let patterns = self.registry.load().await?;
        if patterns.is_empty() {
            log::debug!("No target sites defined. Skipping check.");
        }

        let Some(tab) = self.tabs.active_tab().await? else {
            return Ok(ReminderOutcome::NoActiveTab);
        };

        if !matches(&tab, &patterns) {
            log::debug!("Currently on: {} (not a target site)", tab.display_url());
            return Ok(ReminderOutcome::NotMatched);
        }

        log::info!("Currently on a target site: {}", tab.display_url());
        self.notifier.remind(&tab.display_url().to_lowercase()).await;
        Ok(ReminderOutcome::Reminded(tab))
    }

    /// Long-interval check: close a matching active tab, with bounded retries
    pub async fn enforcement_cycle(&self) -> EnforcementOutcome {
        match self.enforce().await {
            Ok(outcome) => {
                log::info!("Enforcement cycle finished: {:?}", outcome);
                outcome
            }
            Err(e) => {
                log::error!("Error in shutdown alarm handler: {}", e);
                EnforcementOutcome::Errored(e.to_string())
            }
        }
    }

    async fn enforce(&self) -> MonitorResult<EnforcementOutcome> {
        let patterns = self.registry.load().await?;

        let Some(tab) = self.tabs.active_tab().await? else {
            return Ok(EnforcementOutcome::NoActiveTab);
        };
        if !matches(&tab, &patterns) {
            return Ok(EnforcementOutcome::NotMatched);
        }

        self.close_with_retries(tab.id, tab.display_url()).await
    }

    /// Retry loop. At most `max_close_attempts` closes, exactly one terminal
    /// notification once a close has been attempted.
    async fn close_with_retries(&self, tab_id: TabId, url: &str) -> MonitorResult<EnforcementOutcome> {
        let max_attempts = self.config.max_close_attempts;
        let mut attempts = 0;

        while attempts < max_attempts {
            let still_matching = match self.still_matches(tab_id).await {
                Ok(still_matching) => still_matching,
                // A close was already attempted, so the user still gets the failure notice
                Err(e) if attempts > 0 => {
                    log::warn!("Re-check of tab {} failed after {} attempt(s): {}", tab_id, attempts, e);
                    break;
                }
                Err(e) => return Err(e),
            };
            if !still_matching {
                log::info!("Tab {} no longer matches a target site or is gone.", tab_id);
                return Ok(EnforcementOutcome::Resolved { attempts });
            }

            attempts += 1;
            match self.tabs.close_tab(tab_id).await {
                Ok(()) => {
                    log::info!("Tab {} closed successfully on attempt {}.", tab_id, attempts);
                    self.notifier
                        .notify(Notice::Closed {
                            url: url.to_string(),
                        })
                        .await;
                    return Ok(EnforcementOutcome::Closed { attempts });
                }
                Err(e) => {
                    log::warn!("Attempt {} to close tab {} failed: {}", attempts, tab_id, e);
                    if attempts < max_attempts {
                        self.delay.sleep(self.config.retry_backoff()).await;
                    }
                }
            }
        }

        self.notifier
            .notify(Notice::Failed {
                url: url.to_string(),
                attempts,
            })
            .await;
        Ok(EnforcementOutcome::Exhausted { attempts })
    }

    /// Freshness re-check against the registry's current copy
    async fn still_matches(&self, tab_id: TabId) -> MonitorResult<bool> {
        match self.tabs.get_tab(tab_id).await {
            Ok(fresh) => Ok(matches(&fresh, &self.registry.patterns())),
            Err(MonitorError::TabGone { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
