/// Mindful Browse - Chrome Extension that nags about, then closes, distracting tabs
/// Built with Rust + WASM + Yew

mod background;
mod chrome;
mod config;
mod error;
mod host;
mod inspector;
mod notifier;
mod overlay;
mod registry;
mod router;
mod scheduler;
mod storage;
mod tab_data;
pub mod ui;

#[cfg(test)]
mod testing;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::background::{build_router, config_from_js, event_queue, pump_events, EventSender};
use crate::chrome::ChromeHost;
use crate::router::{BrowserEvent, RuntimeMessage};
use crate::tab_data::{TabChange, UpdatedTab};

thread_local! {
    static EVENTS: RefCell<Option<EventSender>> = const { RefCell::new(None) };
}

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Start the background monitor: alarms, initial load, first check
#[wasm_bindgen]
pub fn start_background(config: JsValue) -> Result<(), JsValue> {
    let config = config_from_js(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let router = Rc::new(build_router(Rc::new(ChromeHost::new()), config));
    let (events, queue) = event_queue();

    spawn_local(pump_events(router, queue, |task| spawn_local(task)));
    EVENTS.with(|slot| *slot.borrow_mut() = Some(events));

    push_event(BrowserEvent::Startup);
    Ok(())
}

#[wasm_bindgen]
pub fn on_alarm(name: String) {
    push_event(BrowserEvent::Alarm(name));
}

#[wasm_bindgen]
pub fn on_tab_activated(tab_id: i32) {
    push_event(BrowserEvent::TabActivated(tab_id));
}

#[wasm_bindgen]
pub fn on_tab_updated(change_info: JsValue, tab: JsValue) {
    let change: TabChange = match serde_wasm_bindgen::from_value(change_info) {
        Ok(change) => change,
        Err(e) => {
            log::debug!("Ignoring tab update: {:?}", e);
            return;
        }
    };
    if !change.is_complete() {
        return;
    }

    match serde_wasm_bindgen::from_value::<UpdatedTab>(tab) {
        Ok(tab) => {
            if let Some(event) = BrowserEvent::from_tab_update(&change, tab) {
                push_event(event);
            }
        }
        Err(e) => log::warn!("Failed to parse updated tab: {:?}", e),
    }
}

#[wasm_bindgen]
pub fn on_message(message: JsValue) {
    match serde_wasm_bindgen::from_value::<RuntimeMessage>(message) {
        Ok(message) => {
            log::info!("Received message to update target sites. Reloading from storage...");
            push_event(BrowserEvent::Message(message));
        }
        Err(_) => log::debug!("Ignoring unrelated runtime message"),
    }
}

// Start the Yew app for the options popup
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsApp>::new().render();
}

fn push_event(event: BrowserEvent) {
    EVENTS.with(|slot| match slot.borrow().as_ref() {
        Some(events) => {
            if events.unbounded_send(event).is_err() {
                log::error!("Event queue is closed");
            }
        }
        None => log::warn!("Background not started; dropping {:?}", event),
    });
}
