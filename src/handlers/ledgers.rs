//! POST /ledgers, GET /ledgers, PATCH /ledgers/:id

use super::{found, parse_path_uuid, required_metadata_filter, QueryPairs};
use crate::error::AppError;
use crate::extractors::{decode_json, JsonBody, Session};
use crate::models::{CreateLedgerRequest, UpdateLedgerRequest};
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::time::Instant;

pub async fn create(
    State(state): State<AppState>,
    Session(owner): Session,
    JsonBody(req): JsonBody<CreateLedgerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let started = Instant::now();
    tracing::debug!("ledger.create.start");
    let new = req.validate(owner)?;
    let ledger = state.store.create_ledger(&new).await?;
    tracing::info!(
        uuid = %ledger.uuid,
        owned = owner.is_some(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ledger.create.complete"
    );
    Ok(success_one(ledger))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<impl IntoResponse, AppError> {
    let filter = required_metadata_filter(&params)?;
    let ledgers = found(state.store.list_ledgers(&filter).await?)?;
    Ok(success_many(ledgers))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let uuid = parse_path_uuid(&id)?;
    let current = state
        .store
        .get_ledger(uuid)
        .await?
        .ok_or(AppError::NotFound)?;

    let req: UpdateLedgerRequest = decode_json(&body)?;
    req.validate()?;
    let changes = req.merge(&current);
    let ledger = state
        .store
        .update_ledger(uuid, &changes)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(uuid = %ledger.uuid, "ledger updated");
    Ok(success_one_ok(ledger))
}
