use retryable::{ClientError, FormSubmitConfig, OperationConfig};
use reqwest::StatusCode;
use std::time::Duration;
use test_helpers::{mock::Notification, spawn_harness};
use tokio::time::sleep;

#[derive(Debug, Clone, PartialEq)]
struct Signup {
    username: String,
}

fn alice() -> Signup {
    Signup {
        username: "alice".into(),
    }
}

#[tokio::test]
async fn success_toast_on_by_default() -> anyhow::Result<()> {
    let app = spawn_harness();
    let form = app.form_submit(FormSubmitConfig::default(), |signup: Signup| async move {
        Ok::<_, String>(signup.username)
    });

    assert_eq!(form.handle_submit(alice()).await?, "alice");
    assert!(!form.is_submitting());
    assert_eq!(
        app.notifier.notifications(),
        vec![Notification::Success("Form submitted successfully".to_string())]
    );

    Ok(())
}

#[tokio::test]
async fn default_error_message_wins_over_response_body() {
    let app = spawn_harness();
    let form = app.form_submit(FormSubmitConfig::default(), |_: Signup| async {
        Err::<(), _>(ClientError::APIError(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Username taken"}"#.into(),
        ))
    });

    let result = form.handle_submit(alice()).await;

    assert!(result.is_err());
    assert_eq!(
        app.notifier.notifications(),
        vec![Notification::Error("Failed to submit form".to_string())]
    );
    // the error itself is kept for the form to show inline
    let error = form.operation().state().error;
    assert_eq!(
        error.and_then(|e| retryable::OperationError::response_message(&e)),
        Some("Username taken".to_string())
    );
}

#[tokio::test]
async fn messages_can_be_overridden() -> anyhow::Result<()> {
    let app = spawn_harness();
    let config = FormSubmitConfig::default()
        .success_message("Welcome aboard")
        .error_message("Signup failed");
    let form = app.form_submit(config, |signup: Signup| async move {
        if signup.username.is_empty() {
            Err("empty".to_string())
        } else {
            Ok(())
        }
    });

    form.handle_submit(alice()).await?;
    let _ = form
        .handle_submit(Signup {
            username: String::new(),
        })
        .await;

    assert_eq!(
        app.notifier.notifications(),
        vec![
            Notification::Success("Welcome aboard".to_string()),
            Notification::Error("Signup failed".to_string()),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn success_toast_can_be_switched_off() -> anyhow::Result<()> {
    let app = spawn_harness();
    let config = FormSubmitConfig::default()
        .operation(OperationConfig::default().show_success_toast(false));
    let form = app.form_submit(config, |_: Signup| async { Ok::<_, String>(()) });

    form.handle_submit(alice()).await?;

    assert!(app.notifier.notifications().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn is_submitting_while_in_flight() -> anyhow::Result<()> {
    let app = spawn_harness();
    let form = app.form_submit(FormSubmitConfig::default(), |_: Signup| async {
        sleep(Duration::from_millis(100)).await;
        Ok::<_, String>(())
    });

    let submit = form.handle_submit(alice());
    let check = async {
        sleep(Duration::from_millis(10)).await;
        form.is_submitting()
    };
    let (result, during) = tokio::join!(submit, check);

    result?;
    assert!(during);
    assert!(!form.is_submitting());

    Ok(())
}
