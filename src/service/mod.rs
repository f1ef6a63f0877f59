//! Request validation shared by all handlers.

mod validation;
pub use validation::{provided, FieldError, Presence, RequestValidator, Rule};
