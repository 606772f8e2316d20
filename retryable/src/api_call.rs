use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use crate::{
    config::{ApiCallConfig, CallOptions},
    error::{ExecuteError, OperationError},
    executor::Operation,
};

type CallFn<A, T, E> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<T, E>>>;

/// An operation bound to a function of arguments `A`, typically an HTTP call.
///
/// Zero-argument calls use `A = ()`. With `immediate` set the call is made
/// on mount and again whenever the dependency value `D` changes; that is
/// reactive, not a polling timer.
pub struct ApiCall<A, T, E, D = ()> {
    operation: Operation<T, E>,
    config: ApiCallConfig,
    call_fn: CallFn<A, T, E>,
    dependencies: RefCell<Option<D>>,
}

impl<A, T, E, D> ApiCall<A, T, E, D>
where
    A: Clone + 'static,
    T: Clone + 'static,
    E: OperationError,
    D: PartialEq,
{
    pub fn new<F, Fut>(
        operation: Operation<T, E>,
        config: ApiCallConfig,
        call_fn: F,
    ) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        Self {
            operation,
            config,
            call_fn: Rc::new(move |args| call_fn(args).boxed_local()),
            dependencies: RefCell::new(None),
        }
    }

    pub fn operation(&self) -> &Operation<T, E> {
        &self.operation
    }

    pub async fn call(&self, args: A) -> Result<T, ExecuteError<E>> {
        self.call_with(args, CallOptions::default()).await
    }

    pub async fn call_with(
        &self,
        args: A,
        options: CallOptions,
    ) -> Result<T, ExecuteError<E>> {
        let call_fn = self.call_fn.clone();
        self.operation
            .execute(move || call_fn(args.clone()), options)
            .await
    }

    /// Call again with default arguments.
    pub async fn refetch(&self) -> Result<T, ExecuteError<E>>
    where
        A: Default,
    {
        self.call(A::default()).await
    }

    /// Record the latest dependency value, calling when `immediate` is set and
    /// this is the first value seen (mount) or it differs from the previous
    /// one. Returns the outcome when a call was made.
    pub async fn update_dependencies(
        &self,
        dependencies: D,
    ) -> Option<Result<T, ExecuteError<E>>>
    where
        A: Default,
    {
        let changed = {
            let mut current = self.dependencies.borrow_mut();
            let changed = current.as_ref() != Some(&dependencies);
            *current = Some(dependencies);
            changed
        };
        if !self.config.immediate || !changed {
            return None;
        }
        Some(self.refetch().await)
    }
}
