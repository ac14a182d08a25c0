/// Background wiring: builds the router over a host and pumps queued events
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::LocalBoxFuture;
use futures::{FutureExt, StreamExt};
use wasm_bindgen::JsValue;

use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::host::{
    AlarmScheduler, ChangeSignal, Delay, NotificationSink, PatternStore, ScriptInjector, TabSource,
};
use crate::notifier::ReminderNotifier;
use crate::overlay::OverlayController;
use crate::registry::SiteRegistry;
use crate::router::{BrowserEvent, EventRouter};
use crate::scheduler::EnforcementScheduler;

/// Everything the background context needs from the browser
pub trait BrowserHost:
    TabSource + NotificationSink + ScriptInjector + Delay + AlarmScheduler + PatternStore + ChangeSignal
{
}

impl<T> BrowserHost for T where
    T: TabSource + NotificationSink + ScriptInjector + Delay + AlarmScheduler + PatternStore + ChangeSignal
{
}

pub type EventSender = UnboundedSender<BrowserEvent>;

pub fn build_router<H: BrowserHost + 'static>(host: Rc<H>, config: MonitorConfig) -> EventRouter {
    let registry = Rc::new(SiteRegistry::new(
        host.clone(),
        host.clone(),
        &config.storage_key,
        &config.default_sites,
    ));
    let notifier = ReminderNotifier::new(host.clone(), &config.icon_url);
    let scheduler = EnforcementScheduler::new(registry, host.clone(), notifier, host.clone(), config.clone());
    let overlay = OverlayController::new(host.clone(), &config.overlay_marker);

    EventRouter::new(scheduler, overlay, host.clone(), host, config)
}

pub fn event_queue() -> (EventSender, UnboundedReceiver<BrowserEvent>) {
    mpsc::unbounded()
}

/// Drain the queue, handing every event to `spawn` as its own task.
///
/// Tasks are not serialized: a reminder may run while an enforcement retry
/// is waiting out its backoff.
pub async fn pump_events<S>(router: Rc<EventRouter>, mut events: UnboundedReceiver<BrowserEvent>, spawn: S)
where
    S: Fn(LocalBoxFuture<'static, ()>),
{
    while let Some(event) = events.next().await {
        let router = router.clone();
        spawn(async move { router.dispatch(event).await }.boxed_local());
    }
    log::info!("Event queue closed");
}

/// `undefined`/`null` means defaults; anything else must deserialize and validate
pub fn config_from_js(config: JsValue) -> MonitorResult<MonitorConfig> {
    let config = if config.is_undefined() || config.is_null() {
        MonitorConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| MonitorError::Config(format!("Failed to parse config: {:?}", e)))?
    };
    config.validate()?;
    Ok(config)
}
