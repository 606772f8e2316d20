use retryable::{FormSubmit, FormSubmitConfig, OperationError, OperationState};
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

use crate::contexts::toast::use_toast;
use crate::timer::GlooTimer;

pub struct UseFormSubmitHandle<F, T, E> {
    pub state: OperationState<T, E>,
    /// The underlying submission; `handle_submit` returns the outcome.
    pub form: Rc<FormSubmit<F, T, E>>,
    pub is_submitting: bool,
    pub on_submit: Callback<F>,
}

/// Form submission with success and error toasts.
///
/// Success toasts are on by default, with "Form submitted successfully" and
/// "Failed to submit form" as the messages unless `config` says otherwise.
#[hook]
pub fn use_form_submit<F, T, E, S, Fut>(
    config: FormSubmitConfig<T, E>,
    submit_fn: S,
) -> UseFormSubmitHandle<F, T, E>
where
    F: Clone + 'static,
    T: Clone + 'static,
    E: OperationError,
    S: Fn(F) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let toast = use_toast();
    let force_update = use_force_update();

    let form = use_memo((), move |_| {
        let form = FormSubmit::new(
            config,
            Rc::new(toast),
            Rc::new(GlooTimer),
            submit_fn,
        );
        form.operation()
            .set_listener(move || force_update.force_update());
        form
    });

    {
        let form = form.clone();
        use_effect_with((), move |_| move || form.operation().cancel());
    }

    let state = form.operation().state();
    let on_submit = {
        let form = form.clone();
        Callback::from(move |form_data: F| {
            let form = form.clone();
            yew::platform::spawn_local(async move {
                if let Err(e) = form.handle_submit(form_data).await {
                    tracing::debug!("form submission failed: {e}");
                }
            });
        })
    };

    UseFormSubmitHandle {
        is_submitting: state.loading,
        state,
        form,
        on_submit,
    }
}
