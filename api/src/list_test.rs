use schema::{Account, AccountId};
use serde_json::json;

use super::*;
use crate::client::AdminApi;
use crate::session::{MemoryStore, SessionContext, StoredSession};
use crate::testing::ScriptedTransport;
use crate::transport::{ApiRequest, TransportError};

fn page(rows: &[&str], page: u32, total: u64) -> PageResponse<String> {
    PageResponse {
        data: rows.iter().map(|r| (*r).to_owned()).collect(),
        total,
        total_pages: None,
        page,
        page_size: Some(10),
    }
}

#[test]
fn start_clamps_page_and_sets_loading() {
    let mut state = ListState::<String>::new();
    assert_eq!(state.start(0), 1);
    assert!(state.loading);
    assert_eq!(state.requested(), Some(1));
}

#[test]
fn settle_shows_rows_and_server_total() {
    let mut state = ListState::new();
    state.start(2);
    assert!(matches!(state.settle(Ok(page(&["a", "b"], 2, 42))), ListOutcome::Shown));
    assert_eq!(state.rows, vec!["a", "b"]);
    assert_eq!(state.pagination.current, 2);
    assert_eq!(state.pagination.total, 42);
    assert_eq!(state.refetch_page(), 2);
    assert!(!state.loading);
    assert_eq!(state.requested(), None);
}

#[test]
fn failure_leaves_previous_page_untouched() {
    let mut state = ListState::new();
    state.start(1);
    state.settle(Ok(page(&["a"], 1, 11)));
    let before = state.clone();

    state.start(2);
    let outcome = state.settle(Err(ApiError::Transport(TransportError("offline".to_owned()))));
    assert!(matches!(outcome, ListOutcome::Failed(_)));
    assert_eq!(state.rows, before.rows);
    assert_eq!(state.pagination, before.pagination);
    assert!(!state.loading);
}

#[test]
fn emptied_trailing_page_steps_back() {
    let mut state = ListState::new();
    state.start(3);
    state.settle(Ok(page(&["last"], 3, 21)));

    // The only row on page 3 was deleted; 20 records remain.
    state.start(state.refetch_page());
    match state.settle(Ok(page(&[], 3, 20))) {
        ListOutcome::StepBack(target) => assert_eq!(target, 2),
        other => panic!("expected step back, got {other:?}"),
    }
    assert_eq!(state.rows, vec!["last"]);
    assert!(state.loading);

    state.start(2);
    assert!(matches!(state.settle(Ok(page(&["x"; 10], 2, 20))), ListOutcome::Shown));
    assert_eq!(state.pagination.current, 2);
}

#[test]
fn empty_first_page_is_shown() {
    let mut state = ListState::new();
    state.start(1);
    state.settle(Ok(page(&["a"], 1, 1)));

    state.start(1);
    assert!(matches!(state.settle(Ok(page(&[], 1, 0))), ListOutcome::Shown));
    assert!(state.rows.is_empty());
    assert_eq!(state.pagination.summary(), "0 records total");
}

#[test]
fn last_response_wins() {
    let mut state = ListState::new();
    state.start(2);
    state.start(3);
    state.settle(Ok(page(&["three"], 3, 30)));
    state.settle(Ok(page(&["two"], 2, 30)));
    assert_eq!(state.rows, vec!["two"]);
    assert_eq!(state.pagination.current, 2);
    assert_eq!(state.refetch_page(), 2);
}

#[test]
fn out_of_order_responses_keep_rows_and_page_together() {
    let mut state = ListState::new();
    state.start(1);
    state.start(2);
    state.settle(Ok(page(&["p2"], 2, 20)));
    assert_eq!(state.pagination.current, 2);
    state.settle(Ok(page(&["p1"], 1, 20)));
    assert_eq!(state.rows, vec!["p1"]);
    assert_eq!(state.pagination.current, 1);
    assert!(!state.pagination.has_prev());
}

fn accounts_page(names: &[&str], page: u32, total: u64) -> serde_json::Value {
    let data: Vec<_> = names.iter().map(|n| json!({ "ID": n, "Name": n, "Email": format!("{n}@b.com") })).collect();
    json!({ "data": data, "page": page, "total": total })
}

fn signed_in(transport: ScriptedTransport) -> AdminApi<ScriptedTransport, MemoryStore> {
    let api = AdminApi::new(transport, SessionContext::new(MemoryStore::default()));
    api.session().begin(&StoredSession { token: "T1".to_owned(), data: Account::default() }).unwrap();
    api
}

#[tokio::test]
async fn delete_of_last_row_refetches_then_steps_back() {
    let api = signed_in(
        ScriptedTransport::new()
            .respond(200, &accounts_page(&["z"], 3, 21))
            .respond(200, &json!({ "message": "deleted" }))
            .respond(200, &accounts_page(&[], 3, 20))
            .respond(200, &accounts_page(&["k"; 10], 2, 20)),
    );
    let mut state = ListState::new();

    let first = state.start(3);
    let outcome = load_settled(first, |p| api.list_accounts(p), |r| Some(state.settle(r))).await;
    assert!(matches!(outcome, Some(ListOutcome::Shown)));
    assert_eq!(state.pagination.current, 3);

    api.delete_account(&AccountId::new("z").unwrap()).await.unwrap();
    let current = state.start(state.refetch_page());
    let outcome = load_settled(current, |p| api.list_accounts(p), |r| Some(state.settle(r))).await;
    assert!(matches!(outcome, Some(ListOutcome::Shown)));
    assert_eq!(state.pagination.current, 2);
    assert_eq!(state.pagination.total, 20);
    assert_eq!(state.rows.len(), 10);
    assert!(!state.loading);

    let labels: Vec<_> = api.transport().sent().iter().map(ApiRequest::describe).collect();
    assert_eq!(
        labels,
        vec![
            "GET /api/accounts.json?page=3",
            "POST /api/del_account.json",
            "GET /api/accounts.json?page=3",
            "GET /api/accounts.json?page=2",
        ]
    );
    assert_eq!(api.transport().remaining(), 0);
}

#[tokio::test]
async fn failed_refetch_stops_the_loop() {
    let api = signed_in(ScriptedTransport::new().fail("offline"));
    let mut state = ListState::<Account>::new();
    let page = state.start(2);
    let outcome = load_settled(page, |p| api.list_accounts(p), |r| Some(state.settle(r))).await;
    assert!(matches!(outcome, Some(ListOutcome::Failed(ApiError::Transport(_)))));
    assert_eq!(api.transport().sent().len(), 1);
}

#[tokio::test]
async fn dropped_list_stops_before_stepping_back() {
    let api = signed_in(ScriptedTransport::new().respond(200, &accounts_page(&[], 4, 10)));
    let outcome = load_settled(4, |p| api.list_accounts(p), |_| None).await;
    assert!(outcome.is_none());
    assert_eq!(api.transport().sent().len(), 1);
}
