//! Retryable async operations for single-threaded front-ends.
//!
//! An [`Operation`] runs a unit of async work, retrying failed attempts with
//! a fixed delay, and keeps an [`OperationState`] describing the current or
//! last invocation. Terminal outcomes are reported to a [`Notifier`] (a toast
//! system in the browser) and also returned to the caller.
//!
//! The adapters build on top of it:
//!
//! - [`ApiCall`] binds an operation to a function taking arguments, with
//!   optional invocation on mount and on dependency change.
//! - [`FormSubmit`] binds an operation to a form submission with fixed
//!   success and error messages.
//! - [`CachedFetch`] puts a read-through cache with a time-to-live in front
//!   of an operation, persisted to a [`Storage`] backend.
//!
//! Everything here assumes a cooperative, single-threaded executor: handles
//! are `Rc` based and the futures are `!Send`.

pub mod api_call;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod form_submit;
pub mod notify;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod time;
pub mod timer;

pub use api_call::ApiCall;
pub use cache::{ActiveCache, CacheEntry, CachedData, CachedFetch};
pub use client::ClientError;
pub use config::{
    ApiCallConfig, CacheConfig, CallOptions, FormSubmitConfig,
    OperationConfig, RetryConfig,
};
pub use error::{ExecuteError, OperationError};
pub use executor::Operation;
pub use form_submit::FormSubmit;
pub use notify::{Notifier, SilentNotifier};
pub use state::{OperationPhase, OperationState};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use time::TimeSource;
pub use timer::Timer;
#[cfg(not(target_arch = "wasm32"))]
pub use timer::TokioTimer;
