pub mod mock;

use jiff::{Span, Timestamp};
use retryable::{
    CacheConfig, CachedFetch, FormSubmit, FormSubmitConfig, MemoryStorage,
    Operation, OperationConfig, OperationError, TimeSource, TokioTimer,
    telemetry,
};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::rc::Rc;

use crate::mock::RecordingNotifier;

pub const TEST_EPOCH: &str = "2025-01-01T00:00:00Z";

/// Everything an operation under test talks to, with handles kept so tests
/// can inspect and steer them.
pub struct TestHarness {
    pub notifier: Rc<RecordingNotifier>,
    pub storage: MemoryStorage,
    pub time_source: TimeSource,
}

impl TestHarness {
    pub fn operation<T, E>(&self, config: OperationConfig<T, E>) -> Operation<T, E>
    where
        T: Clone + 'static,
        E: OperationError,
    {
        Operation::new(config, self.notifier.clone(), Rc::new(TokioTimer))
    }

    /// A cache over this harness's storage and clock. Error toasts are left
    /// at their default.
    pub fn cached_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        config: CacheConfig,
        fetch_fn: F,
    ) -> CachedFetch<T, E>
    where
        T: Clone + Serialize + DeserializeOwned + 'static,
        E: OperationError,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        CachedFetch::new(
            key,
            config,
            self.operation(OperationConfig::default()),
            Rc::new(self.storage.clone()),
            self.time_source.clone(),
            fetch_fn,
        )
    }

    pub fn form_submit<F, T, E, S, Fut>(
        &self,
        config: FormSubmitConfig<T, E>,
        submit_fn: S,
    ) -> FormSubmit<F, T, E>
    where
        F: Clone + 'static,
        T: Clone + 'static,
        E: OperationError,
        S: Fn(F) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        FormSubmit::new(
            config,
            self.notifier.clone(),
            Rc::new(TokioTimer),
            submit_fn,
        )
    }

    pub fn advance_ms(&self, milliseconds: i64) {
        self.time_source
            .advance(Span::new().milliseconds(milliseconds));
    }

    pub fn set_time(&self, time: Timestamp) {
        self.time_source.set(time);
    }
}

/// Build a harness on a mock clock starting at [`TEST_EPOCH`].
pub fn spawn_harness() -> TestHarness {
    // Only the first harness in the test binary gets to install it
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = telemetry::init_subscriber(subscriber);

    let time_source = TimeSource::mock(
        TEST_EPOCH.parse().expect("TEST_EPOCH is a valid timestamp"),
    );

    TestHarness {
        notifier: Rc::new(RecordingNotifier::default()),
        storage: MemoryStorage::new(),
        time_source,
    }
}
