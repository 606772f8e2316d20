use retryable::{
    CallOptions, Operation, OperationConfig, OperationError, OperationState,
};
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

use crate::contexts::toast::use_toast;
use crate::timer::GlooTimer;

/// Generic async operation hook return type
pub struct UseAsyncOperationHandle<T, E> {
    pub state: OperationState<T, E>,
    /// The underlying operation, for awaiting an outcome directly.
    pub operation: Operation<T, E>,
    pub reset: Callback<()>,
    /// Re-run the last failed invocation; does nothing if there is none.
    pub retry: Callback<()>,
}

impl<T, E> UseAsyncOperationHandle<T, E>
where
    T: Clone + 'static,
    E: OperationError,
{
    /// Run `f` in the background. The outcome shows up in `state` and, unless
    /// the call is silent, as a toast.
    pub fn execute<F, Fut>(&self, f: F, options: CallOptions)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let operation = self.operation.clone();
        yew::platform::spawn_local(async move {
            if let Err(e) = operation.execute(f, options).await {
                tracing::debug!("operation settled with an error: {e}");
            }
        });
    }
}

/// Retrying async operation bound to the component's lifetime.
///
/// The configuration is read on the first render only. Error toasts go to
/// the surrounding `ToastProvider`; state changes re-render the component,
/// and unmounting cancels whatever is still in flight.
///
/// # Example
///
/// ```ignore
/// #[function_component]
/// pub fn SaveButton(props: &SaveButtonProps) -> Html {
///     let save = use_async_operation(
///         OperationConfig::default()
///             .retry(2, 500)
///             .show_success_toast(true),
///     );
///
///     let onclick = {
///         let execute = save.operation.clone();
///         let draft = props.draft.clone();
///         Callback::from(move |_| {
///             let execute = execute.clone();
///             let draft = draft.clone();
///             yew::platform::spawn_local(async move {
///                 let _ = execute
///                     .execute(
///                         move || save_draft(draft.clone()),
///                         CallOptions::default().success_message("Saved"),
///                     )
///                     .await;
///             });
///         })
///     };
///
///     html! {
///         <button {onclick} disabled={save.state.loading}>{"Save"}</button>
///     }
/// }
/// ```
#[hook]
pub fn use_async_operation<T, E>(
    config: OperationConfig<T, E>,
) -> UseAsyncOperationHandle<T, E>
where
    T: Clone + 'static,
    E: OperationError,
{
    let operation = use_operation(config);

    let reset = {
        let operation = operation.clone();
        Callback::from(move |_| operation.reset())
    };

    let retry = {
        let operation = operation.clone();
        Callback::from(move |_| {
            let operation = operation.clone();
            yew::platform::spawn_local(async move {
                let _ = operation.retry().await;
            });
        })
    };

    UseAsyncOperationHandle {
        state: operation.state(),
        operation,
        reset,
        retry,
    }
}

/// Build an operation once per component, reporting to the toast context,
/// re-rendering on state changes and cancelled on unmount.
#[hook]
pub(crate) fn use_operation<T, E>(
    config: OperationConfig<T, E>,
) -> Operation<T, E>
where
    T: Clone + 'static,
    E: OperationError,
{
    let toast = use_toast();
    let force_update = use_force_update();

    let operation = use_memo((), move |_| {
        let operation =
            Operation::new(config, Rc::new(toast), Rc::new(GlooTimer));
        operation.set_listener(move || force_update.force_update());
        operation
    });

    {
        let operation = operation.clone();
        use_effect_with((), move |_| move || operation.cancel());
    }

    (*operation).clone()
}
