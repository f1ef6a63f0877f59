//! SQL text and bound filter values. Identifiers are fixed; every value is a parameter.

mod filter;
pub mod statements;
pub use filter::*;
