use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::shared::DomainResult;

/// Credential store.
///
/// Implementations must reject a second user with the same email with
/// `DomainError::Conflict`, and must create the user row and its credit row
/// as one unit.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user_with_credit(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    /// Current credit balance, `None` if the user does not exist.
    async fn get_credit(&self, user_id: i32) -> DomainResult<Option<i64>>;
}
