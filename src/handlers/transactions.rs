//! Transactions: create, list, update and delete. Each transaction is stored with a mirrored
//! pair of entries (credit `-amount`, debit `+amount`); the database rejects any commit where a
//! transaction's entries do not sum to zero.

use super::{
    found, pairs, parse_path_uuid, query_i64, required_query_uuid, QueryPairs,
};
use crate::error::AppError;
use crate::extractors::{decode_json, JsonBody};
use crate::models::{CreateTransactionRequest, UpdateTransactionRequest};
use crate::response::{success_many, success_one, success_one_ok};
use crate::sql::MetadataFilter;
use crate::state::AppState;
use crate::store::Page;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::time::Instant;

pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let started = Instant::now();
    tracing::debug!("transaction.create.start");
    let params = req.validate()?;
    let transaction = state.store.create_transaction(&params).await?;
    tracing::info!(
        uuid = %transaction.uuid,
        ledger = %transaction.ledger_uuid,
        amount = transaction.amount,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "transaction.create.complete"
    );
    Ok(success_one(transaction))
}

/// Response header carrying the number of matches before `limit`/`offset` apply.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// `ledger_uuid` is required; metadata filter, `limit` and `offset` are optional.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<impl IntoResponse, AppError> {
    let ledger_uuid = required_query_uuid(&params, "ledger_uuid")?;
    let filter = MetadataFilter::from_pairs_or_empty(pairs(&params));
    let page = Page::new(query_i64(&params, "limit")?, query_i64(&params, "offset")?);
    let transactions = found(
        state
            .store
            .list_transactions(ledger_uuid, &filter, page)
            .await?,
    )?;
    let total = state.store.count_transactions(ledger_uuid, &filter).await?;
    Ok((
        [(TOTAL_COUNT_HEADER, total.to_string())],
        success_many(transactions),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let uuid = parse_path_uuid(&id)?;
    let current = state
        .store
        .get_transaction(uuid)
        .await?
        .ok_or(AppError::NotFound)?;

    let req: UpdateTransactionRequest = decode_json(&body)?;
    req.validate()?;
    let params = req.merge(&current)?;
    let transaction = state
        .store
        .update_transaction(uuid, &params)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(uuid = %transaction.uuid, amount = transaction.amount, "transaction updated");
    Ok(success_one_ok(transaction))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uuid = parse_path_uuid(&id)?;
    if !state.store.delete_transaction(uuid).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(uuid = %uuid, "transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::TOTAL_COUNT_HEADER;
    use crate::test_utils::{assert_error, ledger_with_accounts, post_created, test_server};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn post_transaction(
        server: &TestServer,
        ledger: &str,
        credit: &str,
        debit: &str,
        amount: i64,
        date: &str,
    ) -> Value {
        post_created(
            server,
            "/transactions",
            json!({
                "amount": amount,
                "date": date,
                "description": "rent",
                "metadata": {"month": date},
                "credit_account_uuid": credit,
                "debit_account_uuid": debit,
                "ledger_uuid": ledger,
            }),
        )
        .await
    }

    #[tokio::test]
    async fn create_returns_both_sides() {
        let (_, server) = test_server();
        let (ledger, cash, rent) = ledger_with_accounts(&server).await;
        let transaction = post_transaction(&server, &ledger, &cash, &rent, 1200, "2024-01-01").await;
        assert_eq!(transaction["amount"], 1200);
        assert_eq!(transaction["date"], "2024-01-01");
        assert_eq!(transaction["credit_account_uuid"], cash.as_str());
        assert_eq!(transaction["debit_account_uuid"], rent.as_str());
        assert_eq!(transaction["ledger_uuid"], ledger.as_str());
    }

    #[tokio::test]
    async fn invalid_transactions_are_field_errors() {
        let (_, server) = test_server();
        let (ledger, cash, _) = ledger_with_accounts(&server).await;
        let response = server
            .post("/transactions")
            .json(&json!({
                "amount": -5,
                "date": "2024-01-01",
                "credit_account_uuid": cash,
                "debit_account_uuid": cash,
                "ledger_uuid": ledger,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"]["errors"],
            json!([
                {"field": "amount", "message": "Invalid value"},
                {"field": "debit_account_uuid", "message": "Invalid value"},
            ])
        );
    }

    #[tokio::test]
    async fn unknown_account_is_a_server_error() {
        let (_, server) = test_server();
        let (ledger, cash, _) = ledger_with_accounts(&server).await;
        let response = server
            .post("/transactions")
            .json(&json!({
                "amount": 5,
                "date": "2024-01-01",
                "credit_account_uuid": cash,
                "debit_account_uuid": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "ledger_uuid": ledger,
            }))
            .await;
        assert_error(&response, StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paged() {
        let (_, server) = test_server();
        let (ledger, cash, rent) = ledger_with_accounts(&server).await;
        let january = post_transaction(&server, &ledger, &cash, &rent, 100, "2024-01-01").await;
        let march = post_transaction(&server, &ledger, &cash, &rent, 300, "2024-03-01").await;
        let february = post_transaction(&server, &ledger, &cash, &rent, 200, "2024-02-01").await;

        let response = server
            .get("/transactions")
            .add_query_param("ledger_uuid", &ledger)
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["length"], 3);
        let order: Vec<&Value> = body["detail"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| &t["uuid"])
            .collect();
        assert_eq!(order, vec![&march["uuid"], &february["uuid"], &january["uuid"]]);

        let response = server
            .get("/transactions")
            .add_query_param("ledger_uuid", &ledger)
            .add_query_param("limit", "1")
            .add_query_param("offset", "1")
            .await;
        let body = response.json::<Value>();
        assert_eq!(body["length"], 1);
        assert_eq!(body["detail"][0]["uuid"], february["uuid"]);

        let response = server
            .get("/transactions")
            .add_query_param("ledger_uuid", &ledger)
            .add_query_param("metadata.month", "2024-01-01")
            .await;
        let body = response.json::<Value>();
        assert_eq!(body["length"], 1);
        assert_eq!(body["detail"][0]["uuid"], january["uuid"]);
    }

    #[tokio::test]
    async fn total_count_ignores_paging_but_not_filters() {
        let (_, server) = test_server();
        let (ledger, cash, rent) = ledger_with_accounts(&server).await;
        post_transaction(&server, &ledger, &cash, &rent, 100, "2024-01-01").await;
        post_transaction(&server, &ledger, &cash, &rent, 200, "2024-02-01").await;
        post_transaction(&server, &ledger, &cash, &rent, 300, "2024-03-01").await;

        let response = server
            .get("/transactions")
            .add_query_param("ledger_uuid", &ledger)
            .add_query_param("limit", "1")
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["length"], 1);
        assert_eq!(response.header(TOTAL_COUNT_HEADER), "3");

        let response = server
            .get("/transactions")
            .add_query_param("ledger_uuid", &ledger)
            .add_query_param("metadata.month", "2024-02-01")
            .await;
        assert_eq!(response.header(TOTAL_COUNT_HEADER), "1");
    }

    #[tokio::test]
    async fn list_parameter_errors() {
        let (_, server) = test_server();
        let (ledger, _, _) = ledger_with_accounts(&server).await;

        let response = server.get("/transactions").await;
        assert_error(&response, StatusCode::BAD_REQUEST, "Invalid request");

        let response = server
            .get("/transactions")
            .add_query_param("ledger_uuid", &ledger)
            .add_query_param("limit", "many")
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "Invalid request");

        let response = server
            .get("/transactions")
            .add_query_param("ledger_uuid", &ledger)
            .await;
        assert_error(&response, StatusCode::NOT_FOUND, "Not Found");
    }

    #[tokio::test]
    async fn update_merges_and_keeps_the_pair_distinct() {
        let (_, server) = test_server();
        let (ledger, cash, rent) = ledger_with_accounts(&server).await;
        let transaction = post_transaction(&server, &ledger, &cash, &rent, 100, "2024-01-01").await;
        let path = format!("/transactions/{}", transaction["uuid"].as_str().unwrap());

        let response = server.patch(&path).json(&json!({"amount": 150})).await;
        response.assert_status_ok();
        let detail = response.json::<Value>()["detail"].clone();
        assert_eq!(detail["amount"], 150);
        assert_eq!(detail["date"], "2024-01-01");
        assert_eq!(detail["description"], "rent");
        assert_eq!(detail["credit_account_uuid"], cash.as_str());

        let response = server
            .patch(&path)
            .json(&json!({"debit_account_uuid": cash}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server.patch(&path).json(&json!({})).await;
        assert_error(&response, StatusCode::BAD_REQUEST, "Invalid request");

        let response = server
            .patch("/transactions/67e55044-10b1-426f-9247-bb680e5fe0c8")
            .json(&json!({"amount": 1}))
            .await;
        assert_error(&response, StatusCode::NOT_FOUND, "Not Found");
    }

    #[tokio::test]
    async fn delete_then_delete_again() {
        let (_, server) = test_server();
        let (ledger, cash, rent) = ledger_with_accounts(&server).await;
        let transaction = post_transaction(&server, &ledger, &cash, &rent, 100, "2024-01-01").await;
        let path = format!("/transactions/{}", transaction["uuid"].as_str().unwrap());

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        let response = server.delete(&path).await;
        assert_error(&response, StatusCode::NOT_FOUND, "Not Found");

        let response = server.delete("/transactions/nope").await;
        assert_error(&response, StatusCode::NOT_FOUND, "Not Found");
    }
}
