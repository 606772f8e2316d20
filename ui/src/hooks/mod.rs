pub mod use_api_call;
pub mod use_async_operation;
pub mod use_cached_fetch;
pub mod use_form_submit;

pub use use_api_call::{UseApiCallHandle, use_api_call};
pub use use_async_operation::{UseAsyncOperationHandle, use_async_operation};
pub use use_cached_fetch::{UseCachedFetchHandle, use_cached_fetch};
pub use use_form_submit::{UseFormSubmitHandle, use_form_submit};
