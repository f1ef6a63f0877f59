//! POST /accounts, GET /accounts, PATCH /accounts/:id

use super::{found, parse_path_uuid, required_metadata_filter, required_query_uuid, QueryPairs};
use crate::error::AppError;
use crate::extractors::{decode_json, JsonBody};
use crate::models::{CreateAccountRequest, UpdateAccountRequest};
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::IntoResponse,
};

pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = req.validate()?;
    let account = state.store.create_account(&new).await?;
    tracing::info!(uuid = %account.uuid, ledger = %account.ledger_uuid, kind = %account.kind, "account created");
    Ok(success_one(account))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<impl IntoResponse, AppError> {
    let ledger_uuid = required_query_uuid(&params, "ledger_uuid")?;
    let filter = required_metadata_filter(&params)?;
    let accounts = found(state.store.list_accounts(ledger_uuid, &filter).await?)?;
    Ok(success_many(accounts))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let uuid = parse_path_uuid(&id)?;
    let current = state
        .store
        .get_account(uuid)
        .await?
        .ok_or(AppError::NotFound)?;

    let req: UpdateAccountRequest = decode_json(&body)?;
    req.validate()?;
    let changes = req.merge(&current)?;
    let account = state
        .store
        .update_account(uuid, &changes)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(uuid = %account.uuid, "account updated");
    Ok(success_one_ok(account))
}
