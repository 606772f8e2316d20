use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::future::Future;
use std::rc::Rc;

use crate::{
    config::{CallOptions, FormSubmitConfig},
    error::{ExecuteError, OperationError},
    executor::Operation,
    notify::Notifier,
    timer::Timer,
};

type SubmitFn<F, T, E> = Rc<dyn Fn(F) -> LocalBoxFuture<'static, Result<T, E>>>;

/// An operation bound to a form submission.
///
/// Unlike a bare [`Operation`], success toasts are on by default and every
/// submission carries the configured success and error messages.
pub struct FormSubmit<F, T, E> {
    operation: Operation<T, E>,
    success_message: String,
    error_message: String,
    submit_fn: SubmitFn<F, T, E>,
}

impl<F, T, E> FormSubmit<F, T, E>
where
    F: Clone + 'static,
    T: Clone + 'static,
    E: OperationError,
{
    pub fn new<S, Fut>(
        config: FormSubmitConfig<T, E>,
        notifier: Rc<dyn Notifier>,
        timer: Rc<dyn Timer>,
        submit_fn: S,
    ) -> Self
    where
        S: Fn(F) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let FormSubmitConfig {
            success_message,
            error_message,
            operation,
        } = config;

        Self {
            operation: Operation::new(operation, notifier, timer),
            success_message,
            error_message,
            submit_fn: Rc::new(move |form| submit_fn(form).boxed_local()),
        }
    }

    pub fn operation(&self) -> &Operation<T, E> {
        &self.operation
    }

    pub fn is_submitting(&self) -> bool {
        self.operation.state().loading
    }

    pub async fn handle_submit(
        &self,
        form_data: F,
    ) -> Result<T, ExecuteError<E>> {
        let submit_fn = self.submit_fn.clone();
        let options = CallOptions::default()
            .success_message(self.success_message.clone())
            .error_message(self.error_message.clone());
        self.operation
            .execute(move || submit_fn(form_data.clone()), options)
            .await
    }
}
