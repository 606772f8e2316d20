use retryable::{
    ApiCall, ApiCallConfig, OperationConfig, OperationError, OperationState,
};
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

use super::use_async_operation::use_operation;

pub struct UseApiCallHandle<A, T, E, D = ()> {
    pub state: OperationState<T, E>,
    /// The underlying call, for awaiting an outcome directly.
    pub api_call: Rc<ApiCall<A, T, E, D>>,
    pub call: Callback<A>,
    /// Call with default arguments.
    pub refetch: Callback<()>,
}

/// Hook around a function of arguments `A`, typically an API client call.
///
/// With `config.immediate` set the function is called on mount and again
/// whenever `deps` changes. The function captures whatever else it needs;
/// only the first render's function and configuration are used.
///
/// # Example
///
/// ```ignore
/// #[hook]
/// pub fn use_site(
///     site_id: SiteId,
/// ) -> UseApiCallHandle<(), Site, ClientError, SiteId> {
///     use_api_call(
///         site_id,
///         ApiCallConfig { immediate: true },
///         OperationConfig::default().retry(2, 1000),
///         move |()| async move {
///             let response = get_api_client().get_site(&site_id).await?;
///             ok_body(response).await
///         },
///     )
/// }
/// ```
#[hook]
pub fn use_api_call<A, T, E, D, F, Fut>(
    deps: D,
    config: ApiCallConfig,
    operation_config: OperationConfig<T, E>,
    call_fn: F,
) -> UseApiCallHandle<A, T, E, D>
where
    A: Clone + Default + 'static,
    T: Clone + 'static,
    E: OperationError,
    D: PartialEq + Clone + 'static,
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let operation = use_operation(operation_config);
    let state = operation.state();

    let api_call = use_memo((), move |_| {
        ApiCall::<A, T, E, D>::new(operation, config, call_fn)
    });

    // Call on mount and when deps change, if immediate
    {
        let api_call = api_call.clone();
        use_effect_with(deps, move |deps| {
            let deps = deps.clone();
            yew::platform::spawn_local(async move {
                if let Some(Err(e)) = api_call.update_dependencies(deps).await {
                    tracing::debug!("immediate call failed: {e}");
                }
            });
        });
    }

    let call = {
        let api_call = api_call.clone();
        Callback::from(move |args: A| {
            let api_call = api_call.clone();
            yew::platform::spawn_local(async move {
                let _ = api_call.call(args).await;
            });
        })
    };

    let refetch = {
        let api_call = api_call.clone();
        Callback::from(move |_| {
            let api_call = api_call.clone();
            yew::platform::spawn_local(async move {
                let _ = api_call.refetch().await;
            });
        })
    };

    UseApiCallHandle {
        state,
        api_call,
        call,
        refetch,
    }
}
