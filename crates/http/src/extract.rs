//! Extractors that turn malformed or out-of-bounds input into
//! [`AppError::Validation`] instead of axum's default plain-text rejections.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// JSON request body whose parse failures are reported as validation errors.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::validation(
                    vec![json!({ "field": "body", "error": rejection.body_text() })],
                    "Request body could not be parsed",
                )
            })?;
        Ok(Self(value))
    }
}

/// JSON request body that also passes [`Validate`] before the handler runs.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate().map_err(AppError::from_validation_errors)?;
        Ok(Self(value))
    }
}

/// Query string that parses and passes [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation(
                    vec![json!({ "field": "query", "error": rejection.body_text() })],
                    "Query string could not be parsed",
                )
            })?;
        value.validate().map_err(AppError::from_validation_errors)?;
        Ok(Self(value))
    }
}
