use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::claims::Identity;
use super::jwt::JwtKeys;
use crate::error::AppError;

/// Extracts and validates the bearer token; rejects with `NotAuthenticated`.
pub struct AuthUser(pub Identity);

/// Same as [`AuthUser`] but yields `None` instead of rejecting, so the handler
/// decides what a missing identity means.
pub struct MaybeUser(pub Option<Identity>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
}

fn identity(parts: &Parts, keys: &JwtKeys) -> Option<Identity> {
    let token = bearer_token(parts)?;
    match keys.verify_access(token) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            warn!(error = %e, "invalid or expired token");
            None
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        identity(parts, &keys)
            .map(AuthUser)
            .ok_or(AppError::NotAuthenticated)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        Ok(MaybeUser(identity(parts, &keys)))
    }
}
