//! Request extractors: JSON bodies mapped onto [crate::error::AppError] and the optional session.

mod json;
mod session;

pub use json::{decode_json, JsonBody};
pub use session::Session;
