/// Options popup: view, add and remove target-site patterns

use std::rc::Rc;
use std::time::Duration;

use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::chrome::ChromeHost;
use crate::config::MonitorConfig;
use crate::host::Delay;
use crate::registry::SiteRegistry;
use crate::storage::SiteList;
use crate::ui::components::{SiteRow, StatusLine, StatusMessage};

const MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Idle,
    Saving,
    Error(String),
}

fn chrome_registry() -> SiteRegistry {
    let host = Rc::new(ChromeHost::new());
    let config = MonitorConfig::default();
    SiteRegistry::new(host.clone(), host, &config.storage_key, &config.default_sites)
}

#[function_component(OptionsApp)]
pub fn options_app() -> Html {
    let state = use_state(|| PopupState::Loading);
    let sites = use_state(SiteList::new);
    let input_value = use_state(String::new);
    let message = use_state(|| None::<StatusMessage>);
    let message_seq = use_mut_ref(|| 0u32);

    // Load sites on mount
    {
        let state = state.clone();
        let sites = sites.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let registry = chrome_registry();
                match registry.load().await {
                    Ok(_) => {
                        sites.set(registry.site_list());
                        state.set(PopupState::Idle);
                    }
                    Err(e) => {
                        state.set(PopupState::Error(e.to_string()));
                    }
                }
            });
            || ()
        });
    }

    // Show a message, cleared after a few seconds unless replaced
    let show_message = {
        let message = message.clone();
        let message_seq = message_seq.clone();

        Callback::from(move |msg: StatusMessage| {
            let seq = {
                let mut current = message_seq.borrow_mut();
                *current += 1;
                *current
            };
            message.set(Some(msg));

            let message = message.clone();
            let message_seq = message_seq.clone();
            spawn_local(async move {
                ChromeHost::new().sleep(MESSAGE_TIMEOUT).await;
                if *message_seq.borrow() == seq {
                    message.set(None);
                }
            });
        })
    };

    let save = {
        let state = state.clone();
        let sites = sites.clone();
        let show_message = show_message.clone();

        Callback::from(move |(updated, success): (SiteList, String)| {
            let state = state.clone();
            let sites = sites.clone();
            let show_message = show_message.clone();

            state.set(PopupState::Saving);
            spawn_local(async move {
                match chrome_registry().replace(updated.as_slice()).await {
                    Ok(saved) => {
                        sites.set(SiteList::from_raw(saved));
                        state.set(PopupState::Idle);
                        show_message.emit(StatusMessage::info(success));
                    }
                    Err(e) => {
                        state.set(PopupState::Idle);
                        show_message.emit(StatusMessage::error(e.to_string()));
                    }
                }
            });
        })
    };

    let add_site = {
        let sites = sites.clone();
        let input_value = input_value.clone();
        let save = save.clone();
        let show_message = show_message.clone();

        Callback::from(move |_: ()| {
            let mut updated = (*sites).clone();
            match updated.add(&input_value) {
                Ok(pattern) => {
                    input_value.set(String::new());
                    save.emit((updated, format!("'{}' added.", pattern)));
                }
                Err(e) => show_message.emit(StatusMessage::error(e.to_string())),
            }
        })
    };

    let on_add_click = {
        let add_site = add_site.clone();
        Callback::from(move |_: MouseEvent| add_site.emit(()))
    };

    let on_keypress = {
        let add_site = add_site.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                add_site.emit(());
            }
        })
    };

    let on_input = {
        let input_value = input_value.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                input_value.set(input.value());
            }
        })
    };

    let on_remove = {
        let sites = sites.clone();
        let save = save.clone();

        Callback::from(move |index: usize| {
            let mut updated = (*sites).clone();
            if let Some(removed) = updated.remove_at(index) {
                save.emit((updated, format!("'{}' removed.", removed)));
            }
        })
    };

    let is_busy = !matches!(*state, PopupState::Idle);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Mindful Browse"}</h1>
            <p class="popup-subtitle">{format!("Sites that trigger a reminder ({}):", sites.len())}</p>

            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                PopupState::Idle | PopupState::Saving => html! {
                    <ul class="site-list">
                        if sites.is_empty() {
                            <li class="site-empty">{"No sites added yet."}</li>
                        }
                        {for sites.as_slice().iter().enumerate().map(|(index, pattern)| html! {
                            <SiteRow
                                key={pattern.clone()}
                                index={index}
                                pattern={pattern.clone()}
                                on_remove={on_remove.clone()}
                                disabled={is_busy}
                            />
                        })}
                    </ul>
                },
            }}

            <div class="flex-row-gap">
                <input
                    class="pf-v5-c-form-control"
                    type="text"
                    placeholder="e.g. reddit or youtube.com/shorts"
                    value={(*input_value).clone()}
                    oninput={on_input}
                    onkeypress={on_keypress}
                    disabled={is_busy}
                />
                <Button onclick={on_add_click} disabled={is_busy} variant={ButtonVariant::Primary}>
                    {"Add"}
                </Button>
            </div>

            <StatusLine message={(*message).clone()} />

            <p class="footer-popup">
                {"Mindful Browse v0.1.0"}
            </p>
        </div>
    }
}
