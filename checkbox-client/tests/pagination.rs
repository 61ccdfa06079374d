// checkbox-client/tests/pagination.rs
// Lazy listings over paged endpoints

mod common;

use std::sync::Arc;

use checkbox_client::method::receipts::{GetReceipts, GetReceiptsSearch};
use checkbox_client::method::shifts::GetShifts;
use checkbox_client::method::transactions::GetTransactions;
use checkbox_client::{Client, ClientError, Pagination, SessionStorage};
use common::{ScriptedEffects, config};
use futures::{StreamExt, TryStreamExt};
use serde_json::{Value, json};

fn page(limit: u32, offset: u32, results: Vec<Value>) -> Value {
    json!({"meta": {"limit": limit, "offset": offset}, "results": results})
}

fn items(range: std::ops::Range<u32>) -> Vec<Value> {
    range.map(|n| json!({"n": n})).collect()
}

fn client(effects: &Arc<ScriptedEffects>) -> Client<Arc<ScriptedEffects>> {
    Client::with_effects(config(), Arc::clone(effects))
}

fn offsets(effects: &ScriptedEffects) -> Vec<String> {
    effects
        .requests()
        .iter()
        .map(|r| r.query.get("offset").unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_stops_at_first_empty_page() {
    let effects = Arc::new(ScriptedEffects::json([
        page(10, 0, items(0..10)),
        page(10, 10, vec![]),
    ]));
    let client = client(&effects);
    let mut session = SessionStorage::new();
    let mut receipts = GetReceipts::new();

    let listed: Vec<Value> = client
        .paginate(&mut receipts, &mut session)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(listed, items(0..10));
    assert_eq!(effects.requests().len(), 2);
    assert_eq!(offsets(&effects), vec!["0", "10"]);
}

#[tokio::test]
async fn test_follows_server_clamped_limit() {
    let effects = Arc::new(ScriptedEffects::json([
        page(25, 0, items(0..25)),
        page(25, 25, items(25..30)),
        page(25, 50, vec![]),
    ]));
    let client = client(&effects);
    let mut session = SessionStorage::new();
    let mut shifts = GetShifts::new().with_pagination(Pagination::new(50, 0));

    let listed: Vec<Value> = client
        .paginate(&mut shifts, &mut session)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(listed.len(), 30);
    let requests = effects.requests();
    assert_eq!(requests[0].query.get("limit"), Some("50"));
    assert_eq!(requests[1].query.get("limit"), Some("25"));
    assert_eq!(offsets(&effects), vec!["0", "25", "50"]);
}

#[tokio::test]
async fn test_listing_again_continues_from_last_window() {
    let effects = Arc::new(ScriptedEffects::json([
        page(10, 0, items(0..10)),
        page(10, 10, vec![]),
    ]));
    let client = client(&effects);
    let mut session = SessionStorage::new();
    let mut receipts = GetReceipts::new();

    let first: Vec<Value> = client
        .paginate(&mut receipts, &mut session)
        .into_stream()
        .try_collect()
        .await
        .unwrap();
    let second: Vec<Value> = client
        .paginate(&mut receipts, &mut session)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(first.len(), 10);
    assert!(second.is_empty());
    assert_eq!(offsets(&effects), vec!["0", "10", "10"]);
}

#[tokio::test]
async fn test_next_page_is_lazy() {
    let effects = Arc::new(ScriptedEffects::json([
        page(2, 0, items(0..2)),
        page(2, 2, items(2..4)),
        page(2, 4, vec![]),
    ]));
    let client = client(&effects);
    let mut session = SessionStorage::new();
    let mut transactions = GetTransactions::new().with_pagination(Pagination::new(2, 0));

    let mut pages = client.paginate(&mut transactions, &mut session);
    let first = pages.next_page().await.unwrap();
    assert_eq!(first, Some(items(0..2)));
    assert_eq!(effects.requests().len(), 1);

    let second = pages.next_page().await.unwrap();
    assert_eq!(second, Some(items(2..4)));
    assert_eq!(pages.next_page().await.unwrap(), None);
    assert_eq!(pages.next_page().await.unwrap(), None);
    assert_eq!(effects.requests().len(), 3);
}

#[tokio::test]
async fn test_page_without_meta_is_an_error() {
    let effects = Arc::new(ScriptedEffects::json([json!({"results": [{"n": 0}]})]));
    let client = client(&effects);
    let mut session = SessionStorage::new();
    let mut receipts = GetReceipts::new();

    let results: Vec<_> = client
        .paginate(&mut receipts, &mut session)
        .into_stream()
        .collect()
        .await;

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(ClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_zero_limit_is_rejected() {
    let effects = Arc::new(ScriptedEffects::json([page(0, 0, vec![])]));
    let client = client(&effects);
    let mut session = SessionStorage::new();
    let mut receipts = GetReceipts::new().with_pagination(Pagination::new(0, 0));

    let err = client
        .paginate(&mut receipts, &mut session)
        .next_page()
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(effects.requests().is_empty());
}

#[tokio::test]
async fn test_zero_server_limit_ends_listing_with_error() {
    let effects = Arc::new(ScriptedEffects::json([page(0, 0, items(0..3))]));
    let client = client(&effects);
    let mut session = SessionStorage::new();
    let mut receipts = GetReceipts::new();

    let results: Vec<_> = client
        .paginate(&mut receipts, &mut session)
        .into_stream()
        .collect()
        .await;

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(ClientError::InvalidResponse(_))));
    assert_eq!(effects.requests().len(), 1);
    assert_eq!(receipts.pagination, Pagination::default());
}

#[tokio::test]
async fn test_receipt_search_pages_with_filters() {
    let registers = [
        "3a4b5c6d-7e8f-4a0b-9c1d-2e3f4a5b6c7d",
        "4b5c6d7e-8f9a-4b1c-8d2e-3f4a5b6c7d8e",
    ];
    let effects = Arc::new(ScriptedEffects::json([
        page(2, 0, items(0..2)),
        page(2, 2, vec![]),
    ]));
    let client = client(&effects);
    let mut session = SessionStorage::new();
    let mut search = GetReceiptsSearch {
        fiscal_code: Some("TEST-FC".into()),
        self_receipts: false,
        ..GetReceiptsSearch::new()
            .with_pagination(Pagination::new(2, 0))
            .with_cash_register_ids(registers)
    };

    let listed: Vec<Value> = client
        .paginate(&mut search, &mut session)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(listed, items(0..2));
    assert_eq!(offsets(&effects), vec!["0", "2"]);
    for request in effects.requests() {
        assert_eq!(request.path, "receipts/search");
        assert_eq!(
            request.query.get_all("cash_register_id").collect::<Vec<_>>(),
            registers
        );
        assert_eq!(request.query.get("fiscal_code"), Some("TEST-FC"));
        assert_eq!(request.query.get("self_receipts"), Some("false"));
    }
}
