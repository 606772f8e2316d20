use futures::FutureExt;
use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use retryable::Timer;

/// Waits on the browser's `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn delay(&self, duration_ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(duration_ms).boxed_local()
    }
}
