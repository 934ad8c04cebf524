//! Domain layer: account entities and the credential store contract.

pub mod user;

pub use user::{CreateUserDto, User, UserRepositoryInterface, INITIAL_CREDIT};

pub use crate::shared::{DomainError, DomainResult};
