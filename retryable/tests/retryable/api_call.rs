use retryable::{
    ApiCall, ApiCallConfig, CallOptions, ClientError, OperationConfig,
};
use reqwest::StatusCode;
use std::cell::Cell;
use std::rc::Rc;
use test_helpers::spawn_harness;

#[tokio::test]
async fn call_passes_arguments() -> anyhow::Result<()> {
    let app = spawn_harness();
    let api: ApiCall<u32, String, String> = ApiCall::new(
        app.operation(OperationConfig::default()),
        ApiCallConfig::default(),
        |user_id: u32| async move { Ok(format!("user-{user_id}")) },
    );

    assert_eq!(api.call(7).await?, "user-7");
    assert_eq!(api.operation().state().data.as_deref(), Some("user-7"));

    Ok(())
}

#[tokio::test]
async fn refetch_calls_without_arguments() -> anyhow::Result<()> {
    let app = spawn_harness();
    let calls = Rc::new(Cell::new(0));
    let api: ApiCall<(), u32, String> = {
        let calls = calls.clone();
        ApiCall::new(
            app.operation(OperationConfig::default()),
            ApiCallConfig::default(),
            move |()| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Ok(n) }
            },
        )
    };

    assert_eq!(api.refetch().await?, 1);
    assert_eq!(api.refetch().await?, 2);

    Ok(())
}

#[tokio::test]
async fn not_immediate_ignores_dependencies() {
    let app = spawn_harness();
    let calls = Rc::new(Cell::new(0));
    let api: ApiCall<(), (), String, u32> = {
        let calls = calls.clone();
        ApiCall::new(
            app.operation(OperationConfig::default()),
            ApiCallConfig::default(),
            move |()| {
                calls.set(calls.get() + 1);
                async { Ok(()) }
            },
        )
    };

    assert!(api.update_dependencies(1).await.is_none());
    assert!(api.update_dependencies(2).await.is_none());
    assert_eq!(calls.get(), 0);
}

#[tokio::test]
async fn immediate_calls_on_mount_and_dependency_change() {
    let app = spawn_harness();
    let calls = Rc::new(Cell::new(0));
    let api: ApiCall<(), (), String, &str> = {
        let calls = calls.clone();
        ApiCall::new(
            app.operation(OperationConfig::default()),
            ApiCallConfig { immediate: true },
            move |()| {
                calls.set(calls.get() + 1);
                async { Ok(()) }
            },
        )
    };

    // mount
    assert_eq!(api.update_dependencies("site-1").await, Some(Ok(())));
    // re-render with the same dependencies
    assert!(api.update_dependencies("site-1").await.is_none());
    // dependencies changed
    assert_eq!(api.update_dependencies("site-2").await, Some(Ok(())));

    assert_eq!(calls.get(), 2);
}

#[tokio::test(start_paused = true)]
async fn api_errors_are_retried_and_surface_the_body_message() {
    let app = spawn_harness();
    let calls = Rc::new(Cell::new(0));
    let api: ApiCall<(), (), ClientError> = {
        let calls = calls.clone();
        ApiCall::new(
            app.operation(OperationConfig::default().retry(2, 250)),
            ApiCallConfig::default(),
            move |()| {
                calls.set(calls.get() + 1);
                async {
                    Err(ClientError::APIError(
                        StatusCode::CONFLICT,
                        r#"{"message": "Auction already started"}"#.into(),
                    ))
                }
            },
        )
    };

    let error = api.refetch().await.expect_err("every attempt fails");

    assert_eq!(
        error.failure().and_then(ClientError::status),
        Some(StatusCode::CONFLICT)
    );
    assert_eq!(calls.get(), 3);
    assert_eq!(
        app.notifier.errors(),
        vec!["Auction already started".to_string()]
    );
}

#[tokio::test]
async fn call_with_options_can_be_silent() {
    let app = spawn_harness();
    let api: ApiCall<(), (), String> = ApiCall::new(
        app.operation(OperationConfig::default()),
        ApiCallConfig::default(),
        |()| async { Err("offline".to_string()) },
    );

    let result = api.call_with((), CallOptions::default().silent()).await;

    assert!(result.is_err());
    assert!(app.notifier.notifications().is_empty());
}
