//! HTTP interface
//!
//! - `middleware`: bearer-token guard
//! - `modules`: account and health handlers, request-id middleware
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
