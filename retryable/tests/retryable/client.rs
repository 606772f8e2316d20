use retryable::{
    CallOptions, ClientError, OperationConfig,
    client::{ok_body, ok_empty},
};
use reqwest::StatusCode;
use test_helpers::spawn_harness;

fn response(status: u16, body: &'static str) -> reqwest::Response {
    let response = http::Response::builder()
        .status(status)
        .body(body)
        .expect("valid response parts");
    reqwest::Response::from(response)
}

#[tokio::test]
async fn ok_body_deserializes_success() -> anyhow::Result<()> {
    let names: Vec<String> =
        ok_body(response(200, r#"["alice", "bob"]"#)).await?;
    assert_eq!(names, vec!["alice".to_string(), "bob".to_string()]);

    Ok(())
}

#[tokio::test]
async fn error_status_becomes_api_error() {
    let result = ok_empty(response(404, "Site not found")).await;

    match result {
        Err(ClientError::APIError(code, text)) => {
            assert_eq!(code, StatusCode::NOT_FOUND);
            assert_eq!(text, "Site not found");
        }
        _ => {
            panic!("Expected APIError");
        }
    }
}

#[tokio::test]
async fn body_message_reaches_the_notification() {
    let app = spawn_harness();
    let operation = app.operation(OperationConfig::default());

    let result = operation
        .execute(
            || async {
                ok_empty(response(
                    422,
                    r#"{"message": "Bid exceeds available credit"}"#,
                ))
                .await
            },
            CallOptions::default(),
        )
        .await;

    assert!(result.is_err());
    assert_eq!(
        app.notifier.errors(),
        vec!["Bid exceeds available credit".to_string()]
    );
}

#[tokio::test]
async fn empty_body_falls_back_to_generic_message() {
    let app = spawn_harness();
    let operation = app.operation(OperationConfig::default());

    let _ = operation
        .execute(
            || async { ok_body::<u32>(response(500, "")).await },
            CallOptions::default(),
        )
        .await;

    assert_eq!(
        app.notifier.errors(),
        vec![retryable::error::FALLBACK_ERROR_MESSAGE.to_string()]
    );
}
