//! Authentication guard for Axum
//!
//! Reads `Authorization: Bearer <token>`, verifies the token and resolves the
//! user it names. The resolved user (or `None` if the row is gone) is stored in
//! request extensions as [`CurrentUser`].

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::domain::{User, UserRepositoryInterface};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};
use crate::interfaces::http::error::AccountError;

/// Authentication state containing JWT config and the credential store
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub users: Arc<dyn UserRepositoryInterface>,
}

/// Identity attached by the guard, looked up fresh on every request.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Option<User>);

/// Split `<scheme> <token>` on the first space and require the `Bearer` scheme.
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AccountError> {
    match auth_header.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(AccountError::MalformedCredential),
    }
}

/// Run the guard checks against request headers.
pub async fn authenticate(
    auth_state: &AuthState,
    headers: &HeaderMap,
) -> Result<Option<User>, AccountError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Err(AccountError::Unauthenticated);
    };
    let auth_header = auth_header
        .to_str()
        .map_err(|_| AccountError::MalformedCredential)?;

    let token = extract_bearer_token(auth_header)?;

    let claims = verify_token(token, &auth_state.jwt_config)
        .map_err(|e| AccountError::TokenRejected(e.to_string()))?;

    let user = auth_state
        .users
        .get_user_by_id(claims.user_id)
        .await
        .map_err(|e| AccountError::TokenRejected(e.to_string()))?;

    if user.is_none() {
        warn!(user_id = claims.user_id, "valid token for a user that no longer exists");
    }

    Ok(user)
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AccountError> {
    let user = authenticate(&auth_state, request.headers()).await?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use crate::domain::{CreateUserDto, DomainError, DomainResult, INITIAL_CREDIT};
    use crate::infrastructure::crypto::jwt::{create_token, create_token_at};
    use crate::infrastructure::InMemoryUserRepository;
    use crate::interfaces::http::error::{MSG_BAD_TOKEN, MSG_LOGIN_REQUIRED};

    struct BrokenStore;

    #[async_trait]
    impl UserRepositoryInterface for BrokenStore {
        async fn create_user_with_credit(&self, _dto: CreateUserDto) -> DomainResult<User> {
            Err(DomainError::Database("unavailable".to_string()))
        }
        async fn get_user_by_email(&self, _email: &str) -> DomainResult<Option<User>> {
            Err(DomainError::Database("unavailable".to_string()))
        }
        async fn get_user_by_id(&self, _id: i32) -> DomainResult<Option<User>> {
            Err(DomainError::Database("unavailable".to_string()))
        }
        async fn get_credit(&self, _user_id: i32) -> DomainResult<Option<i64>> {
            Err(DomainError::Database("unavailable".to_string()))
        }
    }

    async fn whoami(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
        user.map(|u| u.email).unwrap_or_else(|| "<none>".to_string())
    }

    fn app(users: Arc<dyn UserRepositoryInterface>) -> (Router, JwtConfig) {
        let jwt_config = JwtConfig::new("guard-secret");
        let state = AuthState {
            jwt_config: jwt_config.clone(),
            users,
        };
        let router = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state, auth_middleware));
        (router, jwt_config)
    }

    async fn seeded() -> (Arc<InMemoryUserRepository>, User) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = repo
            .create_user_with_credit(CreateUserDto {
                email: "a@gmail.com".to_string(),
                password_hash: "digest".to_string(),
                credit: INITIAL_CREDIT,
            })
            .await
            .unwrap();
        (repo, user)
    }

    async fn call(router: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let resp = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("Bearer").is_err());
        assert!(extract_bearer_token("bearer abc").is_err());
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("abc").is_err());
    }

    #[tokio::test]
    async fn missing_header_is_login_required() {
        let (repo, _) = seeded().await;
        let (router, _) = app(repo);

        let (status, body) = call(router, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains(MSG_LOGIN_REQUIRED));
    }

    #[tokio::test]
    async fn wrong_scheme_or_empty_token_is_bad_token() {
        let (repo, _) = seeded().await;
        let (router, _) = app(repo);

        for value in ["Basic abc", "Bearer ", "Bearer", "token-only"] {
            let (status, body) = call(router.clone(), Some(value)).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "header {:?}", value);
            assert!(body.contains(MSG_BAD_TOKEN));
        }
    }

    #[tokio::test]
    async fn valid_token_attaches_user() {
        let (repo, user) = seeded().await;
        let (router, jwt) = app(repo);
        let token = create_token(user.id, &jwt).unwrap();

        let (status, body) = call(router, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "a@gmail.com");
    }

    #[tokio::test]
    async fn token_from_an_hour_ago_is_accepted() {
        let (repo, user) = seeded().await;
        let (router, jwt) = app(repo);
        let token = create_token_at(user.id, Utc::now() - Duration::hours(1), &jwt).unwrap();

        let (status, _) = call(router, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn expired_token_is_a_server_error() {
        let (repo, user) = seeded().await;
        let (router, jwt) = app(repo);
        let token = create_token_at(user.id, Utc::now() - Duration::hours(25), &jwt).unwrap();

        let (status, body) = call(router, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains(MSG_LOGIN_REQUIRED));
    }

    #[tokio::test]
    async fn forged_token_is_a_server_error() {
        let (repo, user) = seeded().await;
        let (router, _) = app(repo);
        let token = create_token(user.id, &JwtConfig::new("someone-else")).unwrap();

        let (status, _) = call(router, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn missing_user_passes_through_as_none() {
        let (repo, user) = seeded().await;
        repo.remove_user(user.id);
        let (router, jwt) = app(repo);
        let token = create_token(user.id, &jwt).unwrap();

        let (status, body) = call(router, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<none>");
    }

    #[tokio::test]
    async fn store_failure_is_a_server_error() {
        let (router, jwt) = app(Arc::new(BrokenStore));
        let token = create_token(1, &jwt).unwrap();

        let (status, _) = call(router, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
