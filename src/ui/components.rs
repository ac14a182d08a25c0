/// Reusable UI components

use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SiteRowProps {
    pub index: usize,
    pub pattern: String,
    pub on_remove: Callback<usize>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(SiteRow)]
pub fn site_row(props: &SiteRowProps) -> Html {
    let onclick = {
        let on_remove = props.on_remove.clone();
        let index = props.index;
        Callback::from(move |_: MouseEvent| on_remove.emit(index))
    };

    html! {
        <li class="site-item">
            <span class="site-pattern">{&props.pattern}</span>
            <Button onclick={onclick} disabled={props.disabled} variant={ButtonVariant::Danger}>
                {"Remove"}
            </Button>
        </li>
    }
}

#[derive(Clone, PartialEq)]
pub enum MessageKind {
    Info,
    Error,
}

#[derive(Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            kind: MessageKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusLineProps {
    pub message: Option<StatusMessage>,
}

#[function_component(StatusLine)]
pub fn status_line(props: &StatusLineProps) -> Html {
    match &props.message {
        Some(StatusMessage { text, kind: MessageKind::Error }) => html! {
            <Alert r#type={AlertType::Danger} title={text.clone()} inline={true}>
            </Alert>
        },
        Some(StatusMessage { text, kind: MessageKind::Info }) => html! {
            <p class="message-paragraph">{text}</p>
        },
        None => html! {},
    }
}
