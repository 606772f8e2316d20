//! Per-instance configuration.
//!
//! Each struct is fixed when the owning handle is built. Defaults:
//!
//! | field                    | default                          |
//! |--------------------------|----------------------------------|
//! | `show_error_toast`       | `true`                           |
//! | `show_success_toast`     | `false` (`true` for form submit) |
//! | `retry.retry_count`      | `0`                              |
//! | `retry.retry_delay_ms`   | `1000`                           |
//! | `ttl_ms`                 | `300_000`                        |
//! | `stale_while_revalidate` | `false`                          |
//! | `immediate`              | `false`                          |

use std::rc::Rc;

pub const DEFAULT_RETRY_DELAY_MS: u32 = 1000;
pub const DEFAULT_TTL_MS: u64 = 300_000;
pub const DEFAULT_FORM_SUCCESS_MESSAGE: &str = "Form submitted successfully";
pub const DEFAULT_FORM_ERROR_MESSAGE: &str = "Failed to submit form";

/// Hook invoked with the result of a terminal outcome.
pub type OutcomeCallback<V> = Rc<dyn Fn(&V)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 means a single attempt.
    pub retry_count: u32,
    /// Wait between two consecutive attempts.
    pub retry_delay_ms: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_count: 0,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

pub struct OperationConfig<T, E> {
    pub show_error_toast: bool,
    pub show_success_toast: bool,
    pub retry: RetryConfig,
    pub on_success: Option<OutcomeCallback<T>>,
    pub on_error: Option<OutcomeCallback<E>>,
}

impl<T, E> Default for OperationConfig<T, E> {
    fn default() -> Self {
        Self {
            show_error_toast: true,
            show_success_toast: false,
            retry: RetryConfig::default(),
            on_success: None,
            on_error: None,
        }
    }
}

impl<T, E> Clone for OperationConfig<T, E> {
    fn clone(&self) -> Self {
        Self {
            show_error_toast: self.show_error_toast,
            show_success_toast: self.show_success_toast,
            retry: self.retry,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T, E> OperationConfig<T, E> {
    pub fn retry(mut self, retry_count: u32, retry_delay_ms: u32) -> Self {
        self.retry = RetryConfig {
            retry_count,
            retry_delay_ms,
        };
        self
    }

    pub fn show_error_toast(mut self, show: bool) -> Self {
        self.show_error_toast = show;
        self
    }

    pub fn show_success_toast(mut self, show: bool) -> Self {
        self.show_success_toast = show;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + 'static) -> Self {
        self.on_success = Some(Rc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&E) + 'static) -> Self {
        self.on_error = Some(Rc::new(callback));
        self
    }
}

/// Options for a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Shown on success when success toasts are enabled. No message, no
    /// toast.
    pub success_message: Option<String>,
    /// Overrides the message derived from the error.
    pub error_message: Option<String>,
    /// Suppress notifications; state is still updated.
    pub silent: bool,
}

impl CallOptions {
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age at which an entry turns stale. An entry exactly this old is
    /// already stale.
    pub ttl_ms: u64,
    /// Serve stale entries without fetching. This does not refresh them in
    /// the background; only a forced fetch replaces a stale entry.
    pub stale_while_revalidate: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            stale_while_revalidate: false,
        }
    }
}

impl CacheConfig {
    pub fn ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    pub fn stale_while_revalidate(mut self, enabled: bool) -> Self {
        self.stale_while_revalidate = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiCallConfig {
    /// Call on mount and whenever the dependencies change.
    pub immediate: bool,
}

pub struct FormSubmitConfig<T, E> {
    pub success_message: String,
    pub error_message: String,
    /// Success toasts are on unless switched off here.
    pub operation: OperationConfig<T, E>,
}

impl<T, E> Default for FormSubmitConfig<T, E> {
    fn default() -> Self {
        Self {
            success_message: DEFAULT_FORM_SUCCESS_MESSAGE.to_string(),
            error_message: DEFAULT_FORM_ERROR_MESSAGE.to_string(),
            operation: OperationConfig::default().show_success_toast(true),
        }
    }
}

impl<T, E> FormSubmitConfig<T, E> {
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn operation(mut self, operation: OperationConfig<T, E>) -> Self {
        self.operation = operation;
        self
    }
}
