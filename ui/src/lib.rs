//! Yew bindings for `retryable`.
//!
//! Wrap the app in [`OperationsProvider`] so the hooks can reach the toast
//! context, then use the hooks from [`hooks`] in function components.

use yew::prelude::*;

pub mod components;
pub mod contexts;
pub mod hooks;
pub mod logs;
pub mod storage;
pub mod timer;

use components::toast::ToastContainer;
use contexts::toast::ToastProvider;

#[derive(Properties, PartialEq)]
pub struct OperationsProviderProps {
    pub children: Children,
}

/// Sets up logging and provides the toast context the hooks report to.
#[function_component]
pub fn OperationsProvider(props: &OperationsProviderProps) -> Html {
    use_effect_with((), |_| logs::init_logging());

    html! {
        <ToastProvider>
            {props.children.clone()}
            <ToastContainer />
        </ToastProvider>
    }
}
