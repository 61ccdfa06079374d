// checkbox-client/tests/status_wait.rs
// Polling until a status settles

mod common;

use std::sync::Arc;
use std::time::Duration;

use checkbox_client::method::shifts::GetShift;
use checkbox_client::{Client, ClientError, PollOptions, SessionStorage, StatusWait};
use common::{SHIFT_ID, ScriptedEffects, config, init_tracing, ok, status};
use serde_json::json;

fn shift(status: &str) -> serde_json::Value {
    json!({"id": SHIFT_ID, "status": status})
}

fn client(effects: &Arc<ScriptedEffects>) -> Client<Arc<ScriptedEffects>> {
    Client::with_effects(config(), Arc::clone(effects))
}

#[tokio::test]
async fn test_already_settled_returns_after_one_poll() {
    init_tracing();
    let effects = Arc::new(ScriptedEffects::json([shift("OPENED")]));
    let client = client(&effects);
    let mut session = SessionStorage::new();

    let wait = StatusWait::new(["OPENED", "CLOSED"]);
    let result = client
        .wait_status(&GetShift::new(SHIFT_ID), &mut session, &wait)
        .await
        .unwrap();

    assert_eq!(result["status"], "OPENED");
    assert_eq!(result["@date"], "2024-10-15T08:30:05+00:00");
    assert_eq!(effects.requests().len(), 1);
    assert!(effects.pauses().is_empty());
}

#[tokio::test]
async fn test_created_then_opened() {
    let effects = Arc::new(ScriptedEffects::json([
        json!({"status": "CREATED"}),
        json!({"status": "OPENED"}),
    ]));
    let client = client(&effects);
    let mut session = SessionStorage::new();

    let wait = StatusWait::new(["OPENED", "CLOSED"])
        .with_poll(PollOptions::new().with_relax(Duration::from_millis(50)));
    let result = client
        .wait_status(&GetShift::new(SHIFT_ID), &mut session, &wait)
        .await
        .unwrap();

    assert_eq!(result["status"], "OPENED");
    assert_eq!(effects.requests().len(), 2);
    assert_eq!(effects.pauses(), vec![Duration::from_millis(50)]);
    assert_eq!(
        effects.paths(),
        vec![format!("shifts/{SHIFT_ID}"), format!("shifts/{SHIFT_ID}")]
    );
}

#[tokio::test]
async fn test_timeout_reports_last_observed_value() {
    init_tracing();
    let effects = Arc::new(ScriptedEffects::json([shift("OPENING")]));
    let client = client(&effects);
    let mut session = SessionStorage::new();

    let wait = StatusWait::new(["OPENED", "CLOSED"]).with_poll(
        PollOptions::new()
            .with_relax(Duration::from_millis(100))
            .with_timeout(Duration::from_millis(200)),
    );
    let err = client
        .wait_status(&GetShift::new(SHIFT_ID), &mut session, &wait)
        .await
        .unwrap_err();

    match &err {
        ClientError::StatusTimeout {
            field,
            actual,
            elapsed,
            ..
        } => {
            assert_eq!(field, "status");
            assert_eq!(actual, "OPENING");
            assert!(*elapsed > Duration::from_millis(200));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(err.to_string().contains("OPENING"));

    // Polls at 0, 100, 200 and 300 ms; the last one is past the deadline.
    assert_eq!(effects.requests().len(), 4);
    assert_eq!(effects.pauses().len(), 3);
    assert_eq!(effects.elapsed(), Duration::from_millis(300));
}

#[tokio::test]
async fn test_without_timeout_polls_until_settled() {
    let mut script: Vec<_> = (0..20).map(|_| shift("OPENING")).collect();
    script.push(shift("OPENED"));
    let effects = Arc::new(ScriptedEffects::json(script));
    let client = client(&effects);
    let mut session = SessionStorage::new();

    let wait = StatusWait::new(["OPENED"]);
    client
        .wait_status(&GetShift::new(SHIFT_ID), &mut session, &wait)
        .await
        .unwrap();

    assert_eq!(effects.requests().len(), 21);
    assert_eq!(effects.pauses().len(), 20);
}

#[tokio::test]
async fn test_relax_defaults_to_client_config() {
    let effects = Arc::new(ScriptedEffects::json([shift("OPENING"), shift("OPENED")]));
    let client = Client::with_effects(
        config().with_relax(Duration::from_millis(250)),
        Arc::clone(&effects),
    );
    let mut session = SessionStorage::new();

    client
        .wait_status(&GetShift::new(SHIFT_ID), &mut session, &StatusWait::new(["OPENED"]))
        .await
        .unwrap();

    assert_eq!(effects.pauses(), vec![Duration::from_millis(250)]);
}

#[tokio::test]
async fn test_transport_error_ends_wait() {
    let effects = Arc::new(ScriptedEffects::new([
        ok(&shift("OPENING")),
        status(500, &json!({"message": "boom"})),
    ]));
    let client = client(&effects);
    let mut session = SessionStorage::new();

    let err = client
        .wait_status(&GetShift::new(SHIFT_ID), &mut session, &StatusWait::new(["OPENED"]))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Server { status: 500, .. }));
    assert_eq!(effects.requests().len(), 2);
}

#[tokio::test]
async fn test_watches_custom_field() {
    let effects = Arc::new(ScriptedEffects::json([
        json!({"status": "DONE", "tax_status": "PENDING"}),
        json!({"status": "DONE", "tax_status": "SIGNED"}),
    ]));
    let client = client(&effects);
    let mut session = SessionStorage::new();

    let wait = StatusWait::new(["SIGNED"]).with_field("tax_status");
    let result = client
        .wait_status(&GetShift::new(SHIFT_ID), &mut session, &wait)
        .await
        .unwrap();

    assert_eq!(result["tax_status"], "SIGNED");
    assert_eq!(effects.requests().len(), 2);
}
