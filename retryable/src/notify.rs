/// Receives user-facing messages for terminal outcomes.
///
/// Calls are fire-and-forget; a notifier is assumed never to fail.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Drops every message. For hosts without a toast system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn success(&self, message: &str) {
        tracing::trace!("dropping success notification: {message}");
    }

    fn error(&self, message: &str) {
        tracing::trace!("dropping error notification: {message}");
    }
}
