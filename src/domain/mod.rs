//! Shared domain types.

mod types;

pub use types::*;
