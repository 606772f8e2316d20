use crate::contexts::toast::{ToastContext, ToastHandle, ToastKind};
use yew::prelude::*;

/// Renders the toasts currently in the context, newest last.
#[function_component]
pub fn ToastContainer() -> Html {
    let Some(context) = use_context::<ToastContext>() else {
        return html! {};
    };
    let toast_handle = ToastHandle::new(context.clone());

    html! {
        <div class="fixed top-4 right-4 z-50 space-y-3 max-w-sm w-full">
            {for context.toasts().map(|toast| {
                let (class, icon) = match toast.kind {
                    ToastKind::Error => (
                        "bg-red-50 border-red-200 text-red-700",
                        "✕",
                    ),
                    ToastKind::Success => (
                        "bg-green-50 border-green-200 text-green-700",
                        "✓",
                    ),
                };
                let on_close = {
                    let toast_id = toast.id;
                    let toast_handle = toast_handle.clone();
                    Callback::from(move |_| toast_handle.remove(toast_id))
                };

                html! {
                    <div
                        key={toast.id.to_string()}
                        class={format!("p-4 rounded-lg border shadow-lg {class}")}
                    >
                        <span class="text-sm font-medium">{icon}</span>
                        <span class="ml-3 text-sm">{&toast.message}</span>
                        <button onclick={on_close} class="ml-3" title="Dismiss">
                            {"×"}
                        </button>
                    </div>
                }
            })}
        </div>
    }
}
