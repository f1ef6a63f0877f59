//! HTTP handlers for ledgers, accounts, transactions and users.

pub mod accounts;
pub mod ledgers;
pub mod transactions;
pub mod users;

use crate::error::AppError;
use crate::sql::MetadataFilter;
use uuid::Uuid;

/// Query string as ordered pairs; repeated keys keep their order.
pub type QueryPairs = Vec<(String, String)>;

/// Path ids that are not uuids cannot name a record.
fn parse_path_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound)
}

fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn required_query_uuid(params: &[(String, String)], key: &str) -> Result<Uuid, AppError> {
    let raw = query_value(params, key).ok_or_else(|| {
        tracing::info!(param = key, "missing query parameter");
        AppError::InvalidRequest
    })?;
    Uuid::parse_str(raw).map_err(|_| {
        tracing::info!(param = key, value = raw, "query parameter is not a uuid");
        AppError::InvalidRequest
    })
}

/// Optional integer parameter; unparseable values are a bad request.
fn query_i64(params: &[(String, String)], key: &str) -> Result<Option<i64>, AppError> {
    match query_value(params, key) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            tracing::info!(param = key, value = raw, "query parameter is not an integer");
            AppError::InvalidRequest
        }),
    }
}

fn pairs(params: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> {
    params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

fn required_metadata_filter(params: &[(String, String)]) -> Result<MetadataFilter, AppError> {
    MetadataFilter::from_pairs(pairs(params)).map_err(|e| {
        tracing::info!(error = %e, "unable to build metadata filter");
        AppError::InvalidRequest
    })
}

/// An empty listing is reported as absence.
fn found<T>(rows: Vec<T>) -> Result<Vec<T>, AppError> {
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(rows)
}
