use std::fmt;

/// Shown when a failure carries no usable text at all.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Error values an operation may fail with.
///
/// The state store keeps a copy of the last terminal error while the caller
/// receives its own, hence `Clone`.
pub trait OperationError: fmt::Display + Clone + 'static {
    /// Message carried in the body of a failed response, if the error came
    /// from an HTTP call that returned one.
    fn response_message(&self) -> Option<String> {
        None
    }
}

impl OperationError for String {}

/// Why an invocation did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError<E> {
    /// Every attempt failed; holds the error from the final one.
    #[error("{0}")]
    Failed(E),
    /// The owner went away while the invocation was in flight.
    #[error("operation cancelled")]
    Cancelled,
}

impl<E> ExecuteError<E> {
    pub fn failure(&self) -> Option<&E> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Cancelled => None,
        }
    }

    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Pick the text for an error notification.
///
/// In order: the caller's override, the response body message, the error's
/// own text, then [`FALLBACK_ERROR_MESSAGE`].
pub fn notification_message<E: OperationError>(
    error: &E,
    error_message: Option<&str>,
) -> String {
    if let Some(message) = error_message.filter(|m| !m.is_empty()) {
        return message.to_string();
    }
    if let Some(message) = error.response_message().filter(|m| !m.is_empty())
    {
        return message;
    }
    let own = error.to_string();
    if !own.trim().is_empty() {
        return own;
    }
    FALLBACK_ERROR_MESSAGE.to_string()
}
