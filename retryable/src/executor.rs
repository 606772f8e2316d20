//! The retry executor and the state store it drives.
//!
//! ```text
//!            execute()
//!  Idle ───────────────> Loading ──ok──> Success
//!                         │   ^
//!                    err, │   │ after retry_delay_ms
//!           attempt < n   v   │
//!                        (waiting)
//!                         │
//!                    err, attempt == n
//!                         v
//!                      Failure
//! ```
//!
//! Overlapping invocations on one handle are allowed. Each one takes a new
//! generation number when it starts, and only the latest generation may write
//! to the shared state, fire callbacks or notify. Older invocations still
//! hand their own result back to their caller.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use crate::{
    config::{CallOptions, OperationConfig},
    error::{ExecuteError, OperationError, notification_message},
    notify::Notifier,
    state::OperationState,
    timer::Timer,
};

type Invocation<T, E> = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<T, E>>>;

/// Handle to a retryable operation and its state. Clones share everything.
pub struct Operation<T, E> {
    inner: Rc<Inner<T, E>>,
}

struct Inner<T, E> {
    config: OperationConfig<T, E>,
    notifier: Rc<dyn Notifier>,
    timer: Rc<dyn Timer>,
    state: RefCell<OperationState<T, E>>,
    generation: Cell<u64>,
    cancelled: Cell<bool>,
    last_failed: RefCell<Option<(Invocation<T, E>, CallOptions)>>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<T, E> Clone for Operation<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Operation<T, E>
where
    T: Clone + 'static,
    E: OperationError,
{
    pub fn new(
        config: OperationConfig<T, E>,
        notifier: Rc<dyn Notifier>,
        timer: Rc<dyn Timer>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                notifier,
                timer,
                state: RefCell::new(OperationState::default()),
                generation: Cell::new(0),
                cancelled: Cell::new(false),
                last_failed: RefCell::new(None),
                listener: RefCell::new(None),
            }),
        }
    }

    pub fn config(&self) -> &OperationConfig<T, E> {
        &self.inner.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> OperationState<T, E> {
        self.inner.state.borrow().clone()
    }

    /// Register the function called after every state change, replacing any
    /// previous one. UI bindings use this to schedule a re-render.
    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        *self.inner.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Run `f`, retrying failures as configured.
    ///
    /// The final error is both reported (unless the call is silent or error
    /// toasts are off) and returned.
    pub async fn execute<F, Fut>(
        &self,
        f: F,
        options: CallOptions,
    ) -> Result<T, ExecuteError<E>>
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        self.execute_tracked(f, options).await.0
    }

    /// [`Operation::execute`], also telling whether this invocation was still
    /// the latest one when it settled. Side effects that live outside the
    /// state, like cache writes, only follow a current invocation.
    pub(crate) async fn execute_tracked<F, Fut>(
        &self,
        f: F,
        options: CallOptions,
    ) -> (Result<T, ExecuteError<E>>, bool)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let invocation: Invocation<T, E> = Rc::new(move || f().boxed_local());
        self.run(invocation, options).await
    }

    /// Re-run the last invocation that ended in a terminal failure, with its
    /// original options. Returns `None` when there is nothing to retry.
    pub async fn retry(&self) -> Option<Result<T, ExecuteError<E>>> {
        let last_failed = self.inner.last_failed.borrow().clone();
        let Some((invocation, options)) = last_failed else {
            tracing::debug!("retry requested with no failed invocation");
            return None;
        };
        Some(self.run(invocation, options).await.0)
    }

    /// Restore the initial state. In-flight invocations keep running but can
    /// no longer write to the state.
    pub fn reset(&self) {
        self.next_generation();
        *self.inner.last_failed.borrow_mut() = None;
        *self.inner.state.borrow_mut() = OperationState::default();
        self.notify_listener();
    }

    /// Stop all invocations at their next suspension point and freeze the
    /// state. Called when the owner is torn down.
    pub fn cancel(&self) {
        tracing::debug!("operation cancelled");
        self.inner.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Returns the outcome and whether it was applied to the state.
    async fn run(
        &self,
        invocation: Invocation<T, E>,
        options: CallOptions,
    ) -> (Result<T, ExecuteError<E>>, bool) {
        if self.is_cancelled() {
            return (Err(ExecuteError::Cancelled), false);
        }

        let generation = self.next_generation();
        let retry = self.inner.config.retry;
        tracing::debug!(generation, "operation started");
        self.update(generation, |state| {
            state.loading = true;
            state.error = None;
        });

        let mut attempt = 0;
        loop {
            match invocation().await {
                Ok(data) => {
                    let applied = self.settle_success(generation, &data, &options);
                    return (Ok(data), applied);
                }
                Err(error) => {
                    tracing::warn!(
                        generation,
                        attempt,
                        retry_count = retry.retry_count,
                        "operation attempt failed: {error}"
                    );
                    if self.is_cancelled() {
                        return (Err(ExecuteError::Cancelled), false);
                    }

                    if attempt < retry.retry_count {
                        attempt += 1;
                        self.update(generation, |state| state.attempt = attempt);
                        self.inner.timer.delay(retry.retry_delay_ms).await;
                        if self.is_cancelled() {
                            return (Err(ExecuteError::Cancelled), false);
                        }
                        continue;
                    }

                    let applied = self.settle_failure(
                        generation,
                        &error,
                        &options,
                        invocation,
                    );
                    return (Err(ExecuteError::Failed(error)), applied);
                }
            }
        }
    }

    fn settle_success(
        &self,
        generation: u64,
        data: &T,
        options: &CallOptions,
    ) -> bool {
        let applied = self.update(generation, |state| {
            state.loading = false;
            state.data = Some(data.clone());
            state.error = None;
            state.attempt = 0;
        });
        if !applied {
            tracing::debug!(generation, "discarding superseded result");
            return false;
        }
        *self.inner.last_failed.borrow_mut() = None;

        let config = &self.inner.config;
        if let Some(on_success) = &config.on_success {
            on_success(data);
        }
        if config.show_success_toast && !options.silent {
            if let Some(message) = &options.success_message {
                self.inner.notifier.success(message);
            }
        }
        true
    }

    fn settle_failure(
        &self,
        generation: u64,
        error: &E,
        options: &CallOptions,
        invocation: Invocation<T, E>,
    ) -> bool {
        let applied = self.update(generation, |state| {
            state.loading = false;
            state.error = Some(error.clone());
            state.attempt = 0;
        });
        if !applied {
            tracing::debug!(generation, "discarding superseded failure");
            return false;
        }
        tracing::error!(generation, "operation failed: {error}");
        *self.inner.last_failed.borrow_mut() =
            Some((invocation, options.clone()));

        let config = &self.inner.config;
        if let Some(on_error) = &config.on_error {
            on_error(error);
        }
        if config.show_error_toast && !options.silent {
            let message =
                notification_message(error, options.error_message.as_deref());
            self.inner.notifier.error(&message);
        }
        true
    }

    fn next_generation(&self) -> u64 {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        generation
    }

    /// Apply `mutate` if `generation` is still the latest and the operation
    /// has not been cancelled. Returns whether it was applied.
    fn update(
        &self,
        generation: u64,
        mutate: impl FnOnce(&mut OperationState<T, E>),
    ) -> bool {
        if self.is_cancelled() || generation != self.inner.generation.get() {
            return false;
        }
        mutate(&mut self.inner.state.borrow_mut());
        self.notify_listener();
        true
    }

    fn notify_listener(&self) {
        let listener = self.inner.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}
