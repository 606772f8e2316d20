use futures::future::LocalBoxFuture;

/// Waits between retry attempts.
///
/// The delay must be a real wait on the host's event loop; the executor
/// suspends on it and nothing else about the operation moves meanwhile.
pub trait Timer {
    fn delay(&self, duration_ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// Timer backed by `tokio::time`, for native hosts and tests.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
impl Timer for TokioTimer {
    fn delay(&self, duration_ms: u32) -> LocalBoxFuture<'static, ()> {
        use futures::FutureExt;

        let duration = std::time::Duration::from_millis(duration_ms.into());
        tokio::time::sleep(duration).boxed_local()
    }
}
