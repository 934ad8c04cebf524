//! Account API errors and their HTTP mapping.
//!
//! Every failure is terminal for the request and reported with a fixed,
//! user-facing message. Internal detail goes to the log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::infrastructure::crypto::password::PasswordError;
use crate::shared::{DomainError, SignupRuleViolation};

pub const MSG_LOGIN_REQUIRED: &str = "로그인이 필요한 서비스입니다.";
pub const MSG_BAD_TOKEN: &str = "토큰 정보 오류";
pub const MSG_DUPLICATE_EMAIL: &str = "이미 등록된 이메일입니다.";
pub const MSG_INVALID_EMAIL: &str = "이메일의 형식이 올바르지 않습니다";
pub const MSG_WEAK_PASSWORD: &str = "1개 이상의 특수문자를 사용하여 password를 설정해야 합니다.";
pub const MSG_INVALID_CREDENTIALS: &str = "이메일 또는 패스워드를 확인해주세요.";
pub const MSG_SERVER_ERROR: &str = "예상하지 못한 서버 문제가 발생했습니다.";
pub const MSG_CREDIT_LOOKUP_FAILED: &str = "크레딧 조회에 실패했습니다";

/// Error body returned by every failing account endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_message: String,
}

#[derive(Debug, Error)]
pub enum AccountError {
    /// No `Authorization` header
    #[error("missing authorization header")]
    Unauthenticated,

    /// Header present but not `Bearer <token>`
    #[error("malformed authorization header")]
    MalformedCredential,

    /// Signature, expiry or user lookup failed inside the auth guard.
    /// Reported as a server error, not 401.
    #[error("token rejected: {0}")]
    TokenRejected(String),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("email format rejected")]
    InvalidEmailFormat,

    #[error("password has no symbol character")]
    WeakPassword,

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("credit lookup failed: {0}")]
    CreditLookupFailed(String),
}

impl AccountError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::MalformedCredential => StatusCode::FORBIDDEN,
            Self::DuplicateEmail
            | Self::InvalidEmailFormat
            | Self::WeakPassword
            | Self::InvalidCredentials => StatusCode::PRECONDITION_FAILED,
            Self::TokenRejected(_) | Self::Internal(_) | Self::CreditLookupFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Unauthenticated | Self::TokenRejected(_) => MSG_LOGIN_REQUIRED,
            Self::MalformedCredential => MSG_BAD_TOKEN,
            Self::DuplicateEmail => MSG_DUPLICATE_EMAIL,
            Self::InvalidEmailFormat => MSG_INVALID_EMAIL,
            Self::WeakPassword => MSG_WEAK_PASSWORD,
            Self::InvalidCredentials => MSG_INVALID_CREDENTIALS,
            Self::Internal(_) => MSG_SERVER_ERROR,
            Self::CreditLookupFailed(_) => MSG_CREDIT_LOOKUP_FAILED,
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(ErrorResponse {
            error_message: self.public_message().to_string(),
        });

        (status, body).into_response()
    }
}

impl From<DomainError> for AccountError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Conflict(_) => AccountError::DuplicateEmail,
            other => AccountError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for AccountError {
    fn from(err: PasswordError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AccountError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AccountError::Internal(format!("token signing failed: {}", err))
    }
}

impl From<SignupRuleViolation> for AccountError {
    fn from(violation: SignupRuleViolation) -> Self {
        match violation {
            SignupRuleViolation::InvalidEmailFormat => AccountError::InvalidEmailFormat,
            SignupRuleViolation::WeakPassword => AccountError::WeakPassword,
        }
    }
}
