use retryable::{CallOptions, ExecuteError, OperationConfig, OperationState};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use test_helpers::{
    mock::{FlakyOperation, Notification},
    spawn_harness,
};
use tokio::time::{Instant, sleep};

#[tokio::test(start_paused = true)]
async fn failing_operation_runs_retry_count_plus_one_times() {
    let app = spawn_harness();

    for retry_count in 0..4 {
        let flaky = FlakyOperation::<String, String>::always_failing(
            "service unavailable".into(),
        );
        let operation =
            app.operation(OperationConfig::default().retry(retry_count, 5));

        let result = operation
            .execute(flaky.runner(), CallOptions::default())
            .await;

        assert_eq!(
            result,
            Err(ExecuteError::Failed("service unavailable".to_string()))
        );
        assert_eq!(flaky.calls(), retry_count + 1);
    }
}

#[tokio::test(start_paused = true)]
async fn delay_only_between_attempts() {
    let app = spawn_harness();
    let flaky = FlakyOperation::<String, String>::always_failing("down".into());
    let operation = app.operation(OperationConfig::default().retry(3, 100));

    let start = Instant::now();
    let result = operation
        .execute(flaky.runner(), CallOptions::default().silent())
        .await;
    assert!(result.is_err());

    let times = flaky.call_times();
    assert_eq!(times.len(), 4);
    // no delay before the first attempt
    assert_eq!(times[0], start);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(100));
    }
    // nor after the last one
    assert_eq!(Instant::now(), times[3]);
}

#[tokio::test(start_paused = true)]
async fn succeeds_on_third_attempt() -> anyhow::Result<()> {
    let app = spawn_harness();
    let flaky =
        FlakyOperation::succeeding_after(2, "ok".to_string(), "nope".to_string());
    let operation = app.operation(OperationConfig::default().retry(2, 10));

    let start = Instant::now();
    let value = operation
        .execute(flaky.runner(), CallOptions::default())
        .await?;

    assert_eq!(value, "ok");
    assert_eq!(flaky.calls(), 3);
    assert!(start.elapsed() >= Duration::from_millis(20));
    assert_eq!(
        operation.state(),
        OperationState {
            loading: false,
            error: None,
            data: Some("ok".to_string()),
            attempt: 0,
        }
    );
    // failures that were retried away are not reported
    assert!(app.notifier.notifications().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn attempt_counts_up_while_loading() -> anyhow::Result<()> {
    let app = spawn_harness();
    let flaky =
        FlakyOperation::succeeding_after(2, 1_u8, "flaky".to_string());
    let operation = app.operation(OperationConfig::default().retry(2, 10));

    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        let observed = operation.clone();
        operation.set_listener(move || {
            let state = observed.state();
            seen.borrow_mut().push((state.loading, state.attempt));
        });
    }

    operation
        .execute(flaky.runner(), CallOptions::default())
        .await?;

    assert_eq!(
        *seen.borrow(),
        vec![(true, 0), (true, 1), (true, 2), (false, 0)]
    );

    Ok(())
}

#[tokio::test]
async fn single_attempt_failure_is_stored_and_reported() {
    let app = spawn_harness();
    let flaky = FlakyOperation::<u32, String>::always_failing("boom".into());
    let operation = app.operation(OperationConfig::default());

    let result = operation
        .execute(flaky.runner(), CallOptions::default())
        .await;

    assert_eq!(result, Err(ExecuteError::Failed("boom".to_string())));
    assert_eq!(flaky.calls(), 1);

    let state = operation.state();
    assert_eq!(state.error.as_deref(), Some("boom"));
    assert!(!state.loading);
    assert_eq!(state.attempt, 0);
    assert_eq!(app.notifier.errors(), vec!["boom".to_string()]);
}

#[tokio::test]
async fn data_survives_a_later_failure() -> anyhow::Result<()> {
    let app = spawn_harness();
    let operation = app.operation(OperationConfig::default().retry(1, 0));

    let good = FlakyOperation::always_succeeding("X".to_string(), String::new());
    operation
        .execute(good.runner(), CallOptions::default())
        .await?;

    let bad = FlakyOperation::<String, String>::always_failing("later".into());
    let result = operation
        .execute(bad.runner(), CallOptions::default())
        .await;
    assert!(result.is_err());

    let state = operation.state();
    assert_eq!(state.data.as_deref(), Some("X"));
    assert_eq!(state.error.as_deref(), Some("later"));

    Ok(())
}

#[tokio::test]
async fn success_toast_when_enabled_with_message() -> anyhow::Result<()> {
    let app = spawn_harness();
    let operation =
        app.operation(OperationConfig::default().show_success_toast(true));
    let flaky = FlakyOperation::always_succeeding((), "never".to_string());

    operation
        .execute(flaky.runner(), CallOptions::default().success_message("Saved"))
        .await?;

    assert_eq!(
        app.notifier.notifications(),
        vec![Notification::Success("Saved".to_string())]
    );

    Ok(())
}

#[tokio::test]
async fn no_success_toast_by_default_or_without_message() -> anyhow::Result<()> {
    let app = spawn_harness();
    let flaky = FlakyOperation::always_succeeding((), "never".to_string());

    let operation = app.operation(OperationConfig::default());
    operation
        .execute(flaky.runner(), CallOptions::default().success_message("Saved"))
        .await?;

    let operation =
        app.operation(OperationConfig::default().show_success_toast(true));
    operation
        .execute(flaky.runner(), CallOptions::default())
        .await?;

    assert!(app.notifier.notifications().is_empty());

    Ok(())
}

#[tokio::test]
async fn silent_call_updates_state_without_notifying() {
    let app = spawn_harness();
    let operation = app.operation(OperationConfig::default());
    let flaky = FlakyOperation::<(), String>::always_failing("quiet".into());

    let result = operation
        .execute(flaky.runner(), CallOptions::default().silent())
        .await;

    assert!(result.is_err());
    assert_eq!(operation.state().error.as_deref(), Some("quiet"));
    assert!(app.notifier.notifications().is_empty());
}

#[tokio::test]
async fn error_message_override_and_disabled_toasts() {
    let app = spawn_harness();
    let flaky = FlakyOperation::<(), String>::always_failing("raw".into());

    let operation = app.operation(OperationConfig::default());
    let _ = operation
        .execute(
            flaky.runner(),
            CallOptions::default().error_message("Could not load users"),
        )
        .await;

    let operation =
        app.operation(OperationConfig::default().show_error_toast(false));
    let _ = operation
        .execute(flaky.runner(), CallOptions::default())
        .await;

    assert_eq!(
        app.notifier.notifications(),
        vec![Notification::Error("Could not load users".to_string())]
    );
}

#[tokio::test]
async fn outcome_callbacks_fire_once() {
    let app = spawn_harness();
    let successes = Rc::new(Cell::new(0));
    let failures = Rc::new(RefCell::new(Vec::new()));

    let operation = {
        let successes = successes.clone();
        let failures = failures.clone();
        app.operation(
            OperationConfig::default()
                .retry(2, 0)
                .on_success(move |_: &u32| successes.set(successes.get() + 1))
                .on_error(move |e: &String| failures.borrow_mut().push(e.clone())),
        )
    };

    let good = FlakyOperation::succeeding_after(1, 5_u32, "blip".to_string());
    let _ = operation
        .execute(good.runner(), CallOptions::default())
        .await;
    let bad = FlakyOperation::<u32, String>::always_failing("gone".into());
    let _ = operation
        .execute(bad.runner(), CallOptions::default())
        .await;

    assert_eq!(successes.get(), 1);
    assert_eq!(*failures.borrow(), vec!["gone".to_string()]);
}

#[tokio::test]
async fn retry_replays_last_failure_only() -> anyhow::Result<()> {
    let app = spawn_harness();
    let operation = app.operation(OperationConfig::default());

    assert!(operation.retry().await.is_none());

    let flaky =
        FlakyOperation::succeeding_after(1, "second try".to_string(), "first".to_string());
    let result = operation
        .execute(flaky.runner(), CallOptions::default())
        .await;
    assert!(result.is_err());

    let retried = operation.retry().await.expect("a failure was recorded")?;
    assert_eq!(retried, "second try");
    assert_eq!(flaky.calls(), 2);

    // the success cleared the recorded failure
    assert!(operation.retry().await.is_none());
    assert_eq!(flaky.calls(), 2);

    Ok(())
}

#[tokio::test]
async fn reset_restores_initial_state() {
    let app = spawn_harness();
    let operation = app.operation(OperationConfig::default());
    let flaky = FlakyOperation::<u32, String>::always_failing("bad".into());

    let _ = operation
        .execute(flaky.runner(), CallOptions::default())
        .await;
    operation.reset();

    assert_eq!(operation.state(), OperationState::default());
    assert!(operation.retry().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn latest_invocation_owns_the_state() {
    let app = spawn_harness();
    let operation =
        app.operation(OperationConfig::default().show_success_toast(true));

    let slow = operation.execute(
        || async {
            sleep(Duration::from_millis(100)).await;
            Ok::<_, String>("first".to_string())
        },
        CallOptions::default().success_message("first"),
    );
    let fast = operation.execute(
        || async {
            sleep(Duration::from_millis(10)).await;
            Ok::<_, String>("second".to_string())
        },
        CallOptions::default().success_message("second"),
    );
    let (slow, fast) = tokio::join!(slow, fast);

    // both callers get their own result
    assert_eq!(slow, Ok("first".to_string()));
    assert_eq!(fast, Ok("second".to_string()));

    let state = operation.state();
    assert_eq!(state.data.as_deref(), Some("second"));
    assert!(!state.loading);
    assert_eq!(app.notifier.successes(), vec!["second".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn reset_discards_in_flight_result() {
    let app = spawn_harness();
    let operation = app.operation(OperationConfig::default());

    let pending = operation.execute(
        || async {
            sleep(Duration::from_millis(50)).await;
            Ok::<_, String>(9_u32)
        },
        CallOptions::default(),
    );
    let reset = async {
        sleep(Duration::from_millis(10)).await;
        operation.reset();
    };
    let (result, ()) = tokio::join!(pending, reset);

    assert_eq!(result, Ok(9));
    assert_eq!(operation.state(), OperationState::default());
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_the_retry_loop() {
    let app = spawn_harness();
    let operation = app.operation(OperationConfig::default().retry(3, 100));
    let flaky = FlakyOperation::<u32, String>::always_failing("down".into());

    let running = operation.execute(flaky.runner(), CallOptions::default());
    let teardown = async {
        sleep(Duration::from_millis(150)).await;
        operation.cancel();
    };
    let (result, ()) = tokio::join!(running, teardown);

    assert_eq!(result, Err(ExecuteError::Cancelled));
    assert_eq!(flaky.calls(), 2);
    assert!(app.notifier.notifications().is_empty());

    // nothing runs once cancelled
    let result = operation
        .execute(flaky.runner(), CallOptions::default())
        .await;
    assert_eq!(result, Err(ExecuteError::Cancelled));
    assert_eq!(flaky.calls(), 2);
}
