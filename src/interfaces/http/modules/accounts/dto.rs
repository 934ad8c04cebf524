//! Account DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MSG_SIGNUP_SUCCESS: &str = "회원가입 성공";
pub const MSG_LOGIN_SUCCESS: &str = "로그인 성공";
pub const MSG_LOGOUT_SUCCESS: &str = "로그아웃 성공";

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// `Bearer <jwt>`, the same value sent in the header and cookie
    pub token: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreditResponse {
    pub mycredit: i64,
}
