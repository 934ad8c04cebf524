//! JSON body extractor for account endpoints
//!
//! `AccountJson<T>` works like `axum::Json<T>`, but a body that cannot be
//! read or deserialized becomes `AccountError::Internal` (500 with the generic
//! message) instead of axum's 4xx rejection.

use axum::extract::FromRequest;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::interfaces::http::error::AccountError;

pub struct AccountJson<T>(pub T);

impl<S, T> FromRequest<S> for AccountJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AccountError::Internal(format!("invalid request body: {}", rejection)))?;

        Ok(AccountJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
