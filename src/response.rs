//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub const MSG_OK: &str = "OK";

/// Payload kind tag carried in the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DetailKind {
    #[serde(rename = "OBJ")]
    Object,
    #[serde(rename = "LIST")]
    List,
}

/// `{"msg": ..., "length": ..., "type": "OBJ"|"LIST", "detail": ...}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub msg: &'static str,
    pub length: usize,
    #[serde(rename = "type")]
    pub kind: DetailKind,
    pub detail: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn object(detail: T) -> Self {
        Envelope {
            msg: MSG_OK,
            length: 1,
            kind: DetailKind::Object,
            detail,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    pub fn list(detail: Vec<T>) -> Self {
        Envelope {
            msg: MSG_OK,
            length: detail.len(),
            kind: DetailKind::List,
            detail,
        }
    }
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::object(data)))
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope::object(data)))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Envelope<Vec<T>>>) {
    (StatusCode::OK, Json(Envelope::list(data)))
}
