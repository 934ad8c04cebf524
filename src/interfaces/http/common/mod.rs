//! Shared HTTP building blocks

pub mod account_json;

pub use account_json::AccountJson;
