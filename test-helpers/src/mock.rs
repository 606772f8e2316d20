//! Stand-ins for the collaborators an operation depends on.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use retryable::Notifier;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Notifier that remembers every message in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notification::Success(message) => Some(message.clone()),
                Notification::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message.clone()),
                Notification::Success(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notifications
            .borrow_mut()
            .push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notifications
            .borrow_mut()
            .push(Notification::Error(message.to_string()));
    }
}

/// An operation that fails a fixed number of times, then succeeds.
///
/// Clones share the call log, so a clone can be moved into an operation
/// while the original is kept for assertions.
#[derive(Clone)]
pub struct FlakyOperation<T, E> {
    failures: u32,
    value: Option<T>,
    error: E,
    calls: Rc<Cell<u32>>,
    call_times: Rc<RefCell<Vec<Instant>>>,
}

impl<T, E> FlakyOperation<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub fn succeeding_after(failures: u32, value: T, error: E) -> Self {
        Self {
            failures,
            value: Some(value),
            error,
            calls: Rc::new(Cell::new(0)),
            call_times: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn always_succeeding(value: T, error: E) -> Self {
        Self::succeeding_after(0, value, error)
    }

    pub fn always_failing(error: E) -> Self {
        Self {
            failures: u32::MAX,
            value: None,
            error,
            calls: Rc::new(Cell::new(0)),
            call_times: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }

    /// When each call started, on tokio's clock.
    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.borrow().clone()
    }

    pub fn invoke(&self) -> LocalBoxFuture<'static, Result<T, E>> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        self.call_times.borrow_mut().push(Instant::now());

        let outcome = match &self.value {
            Some(value) if call >= self.failures => Ok(value.clone()),
            _ => Err(self.error.clone()),
        };
        futures::future::ready(outcome).boxed_local()
    }

    /// The operation as a closure for `Operation::execute`.
    pub fn runner(
        &self,
    ) -> impl Fn() -> LocalBoxFuture<'static, Result<T, E>> + 'static {
        let operation = self.clone();
        move || operation.invoke()
    }
}
