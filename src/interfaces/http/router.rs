//! API Router with Swagger UI

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::interfaces::http::error::ErrorResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::accounts::{
    self, AccountState, CreditResponse, LoginRequest, LoginResponse, MessageResponse,
    SignupRequest,
};
use crate::interfaces::http::modules::health::{self, HealthResponse, HealthState};
use crate::interfaces::http::modules::request_id::request_id_middleware;

impl FromRef<AccountState> for AuthState {
    fn from_ref(s: &AccountState) -> Self {
        AuthState {
            jwt_config: s.jwt_config.clone(),
            users: s.users.clone(),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("`Authorization: Bearer <token>` as returned by /login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::health_check,
        accounts::handlers::signup,
        accounts::handlers::login,
        accounts::handlers::logout,
        accounts::handlers::get_credit,
    ),
    components(
        schemas(
            HealthResponse,
            SignupRequest,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            CreditResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Accounts", description = "Signup, login, logout and credit balance"),
    ),
    info(
        title = "Credit Accounts API",
        version = "0.1.0",
        description = "User accounts with a starting credit balance"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AccountState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Account routes (public)
    let public_routes = Router::new()
        .route("/signup", post(accounts::signup))
        .route("/login", post(accounts::login))
        .with_state(state.clone());

    // Account routes (protected). `route_layer` keeps the guard off the
    // fallback, so unknown paths still reach the 404 handler after `merge`.
    let protected_routes = Router::new()
        .route("/logout", post(accounts::logout))
        .route("/credit", get(accounts::get_credit))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState::new());

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::CookieConfig;
    use crate::infrastructure::crypto::jwt::JwtConfig;
    use crate::infrastructure::crypto::password::PasswordScheme;
    use crate::infrastructure::InMemoryUserRepository;
    use crate::interfaces::http::modules::request_id::REQUEST_ID_HEADER;

    fn router() -> Router {
        create_api_router(AccountState {
            users: Arc::new(InMemoryUserRepository::new()),
            jwt_config: JwtConfig::new("router-secret"),
            password_scheme: PasswordScheme::Sha512,
            cookie: CookieConfig::default(),
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let resp = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn openapi_lists_account_paths() {
        let (status, body) = get_json("/api-doc/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        for path in ["/signup", "/login", "/logout", "/credit", "/health"] {
            assert!(body["paths"].get(path).is_some(), "missing {}", path);
        }
        assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let resp = router()
            .oneshot(Request::builder().uri("/credit").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // guard rejections pass through the request-id layer too
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let resp = router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_routes_skip_the_auth_guard() {
        for (method, uri) in [("GET", "/nope"), ("POST", "/credit/extra"), ("GET", "/logoutx")] {
            let resp = router()
                .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn guarded_routes_still_require_a_token() {
        for (method, uri) in [("GET", "/credit"), ("POST", "/logout")] {
            let resp = router()
                .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{} {}", method, uri);
        }
    }
}
