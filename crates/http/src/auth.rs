//! Bearer-token guard for protected routes.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use bookshelf_authz::{Claims, TokenService};

use crate::error::AppError;

/// Verified claims of the caller.
///
/// Add `Authenticated` as a handler argument to require a valid
/// `Authorization: Bearer <token>` header. Any router state that exposes an
/// `Arc<TokenService>` through [`FromRef`] works.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<S> for Authenticated
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.verify(token)?;

        tracing::debug!(subject = %claims.sub, "bearer token accepted");
        Ok(Self(claims))
    }
}

/// Returns the credentials of an `Authorization` header using the bearer
/// scheme. The scheme name is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid Authorization header"))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AppError::unauthorized(
            "Invalid Authorization header format",
        )),
    }
}
