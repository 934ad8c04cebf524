//! # Credit Accounts
//!
//! A small account service: signup, login, logout and credit balance lookup
//! over HTTP, with bearer-token sessions.
//!
//! - **domain**: the user model and the credential store trait
//! - **infrastructure**: password hashing, JWT, SeaORM and in-memory stores
//! - **interfaces**: axum router, auth guard and account handlers
//! - **shared**: errors, signup rules, shutdown signal

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository, UserRepository};

pub use interfaces::http::create_api_router;
pub use interfaces::http::modules::accounts::AccountState;
