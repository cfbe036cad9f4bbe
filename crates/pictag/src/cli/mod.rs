//! Command implementations.

pub mod config;
pub mod fetch;
pub mod search;
pub mod tag;
pub mod types;
