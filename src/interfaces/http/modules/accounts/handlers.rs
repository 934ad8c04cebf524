//! Account API handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::info;

use super::dto::{
    CreditResponse, LoginRequest, LoginResponse, MessageResponse, SignupRequest,
    MSG_LOGIN_SUCCESS, MSG_LOGOUT_SUCCESS, MSG_SIGNUP_SUCCESS,
};
use crate::config::CookieConfig;
use crate::domain::{CreateUserDto, UserRepositoryInterface, INITIAL_CREDIT};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{verify_password, PasswordError, PasswordScheme};
use crate::interfaces::http::common::AccountJson;
use crate::interfaces::http::error::{AccountError, ErrorResponse};
use crate::interfaces::http::middleware::CurrentUser;
use crate::shared::validate_signup_fields;

/// Name of the session cookie; its value is `Bearer <jwt>`
pub const AUTH_COOKIE_NAME: &str = "Authorization";

/// Account handler state
#[derive(Clone)]
pub struct AccountState {
    pub users: Arc<dyn UserRepositoryInterface>,
    pub jwt_config: JwtConfig,
    pub password_scheme: PasswordScheme,
    pub cookie: CookieConfig,
}

async fn hash_password(scheme: PasswordScheme, password: String) -> Result<String, AccountError> {
    tokio::task::spawn_blocking(move || scheme.hash(&password))
        .await
        .map_err(|e| AccountError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(AccountError::from)
}

/// Verify against the stored digest, or against the scheme's dummy digest
/// when the account does not exist. A missing account never matches.
async fn check_password(
    scheme: PasswordScheme,
    password: String,
    digest: Option<String>,
) -> Result<bool, AccountError> {
    tokio::task::spawn_blocking(move || -> Result<bool, PasswordError> {
        match digest {
            Some(digest) => Ok(verify_password(&password, &digest)),
            None => {
                verify_password(&password, scheme.dummy_digest()?);
                Ok(false)
            }
        }
    })
    .await
    .map_err(|e| AccountError::Internal(format!("verification task failed: {}", e)))?
    .map_err(AccountError::from)
}

fn auth_cookie(config: &CookieConfig, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_COOKIE_NAME, value))
        .path(config.path.clone())
        .secure(config.secure)
        .http_only(config.http_only)
        .same_site(config.same_site.into())
        .max_age(cookie::time::Duration::seconds(config.max_age_secs))
        .build();
    if let Some(domain) = &config.domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}

/// Expired copy of the auth cookie. Added to the jar directly so the
/// `Set-Cookie` is emitted even when the request carried no cookie.
fn removal_cookie(config: &CookieConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_COOKIE_NAME, "")).path(config.path.clone()).build();
    if let Some(domain) = &config.domain {
        cookie.set_domain(domain.clone());
    }
    cookie.make_removal();
    cookie
}

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Accounts",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 412, description = "Duplicate email, bad email format or weak password", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AccountState>,
    AccountJson(request): AccountJson<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AccountError> {
    if state.users.get_user_by_email(&request.email).await?.is_some() {
        return Err(AccountError::DuplicateEmail);
    }

    validate_signup_fields(&request.email, &request.password)?;

    let password_hash = hash_password(state.password_scheme, request.password).await?;

    let user = state
        .users
        .create_user_with_credit(CreateUserDto {
            email: request.email,
            password_hash,
            credit: INITIAL_CREDIT,
        })
        .await?;

    info!(user_id = user.id, "account created");

    Ok((StatusCode::CREATED, Json(MessageResponse::new(MSG_SIGNUP_SUCCESS))))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token also sent as header and cookie", body = LoginResponse),
        (status = 412, description = "Unknown email or wrong password", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AccountState>,
    jar: CookieJar,
    AccountJson(request): AccountJson<LoginRequest>,
) -> Result<Response, AccountError> {
    let user = state.users.get_user_by_email(&request.email).await?;

    let digest = user.as_ref().map(|u| u.password_hash.clone());
    let valid = check_password(state.password_scheme, request.password, digest).await?;

    let Some(user) = user.filter(|_| valid) else {
        return Err(AccountError::InvalidCredentials);
    };

    let token = create_token(user.id, &state.jwt_config)?;
    let bearer = format!("Bearer {}", token);

    info!(user_id = user.id, "login succeeded");

    let jar = jar.add(auth_cookie(&state.cookie, bearer.clone()));
    let body = LoginResponse {
        token: bearer.clone(),
        message: MSG_LOGIN_SUCCESS.to_string(),
    };

    Ok((
        StatusCode::OK,
        [(header::AUTHORIZATION, bearer)],
        jar,
        Json(body),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cookie cleared; the token itself stays valid until it expires", body = MessageResponse),
        (status = 403, description = "Missing or malformed token", body = ErrorResponse),
        (status = 500, description = "Token rejected or unexpected failure", body = ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<AccountState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(user) = user {
        info!(user_id = user.id, "logout");
    }
    (
        jar.add(removal_cookie(&state.cookie)),
        Json(MessageResponse::new(MSG_LOGOUT_SUCCESS)),
    )
}

#[utoipa::path(
    get,
    path = "/credit",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current credit balance", body = CreditResponse),
        (status = 403, description = "Missing or malformed token", body = ErrorResponse),
        (status = 500, description = "Token rejected or lookup failed", body = ErrorResponse)
    )
)]
pub async fn get_credit(
    State(state): State<AccountState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<CreditResponse>, AccountError> {
    let Some(user) = user else {
        return Err(AccountError::CreditLookupFailed(
            "authenticated user no longer exists".to_string(),
        ));
    };

    let credit = state
        .users
        .get_credit(user.id)
        .await
        .map_err(|e| AccountError::CreditLookupFailed(e.to_string()))?;

    let Some(mycredit) = credit else {
        return Err(AccountError::CreditLookupFailed(format!(
            "no credit for user {}",
            user.id
        )));
    };

    Ok(Json(CreditResponse { mycredit }))
}
