use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use bookshelf_authz::{CredentialStore, TokenService};
use bookshelf_http::{AppError, Authenticated, JsonBody};

use super::models::{GreetingResponse, LoginRequest, TokenResponse};

/// Shared state of the auth routes
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<CredentialStore>,
}

impl FromRef<AuthState> for Arc<TokenService> {
    fn from_ref(state: &AuthState) -> Self {
        state.tokens.clone()
    }
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/protected", get(protected))
        .with_state(state)
}

async fn login(
    State(state): State<AuthState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let subject = state
        .credentials
        .authenticate(&request.username, &request.password)
        .inspect_err(|_| tracing::warn!("login rejected"))?;

    let token = state.tokens.issue(&subject)?;
    tracing::info!(%subject, "access token issued");

    Ok(Json(TokenResponse::bearer(token)))
}

async fn protected(Authenticated(claims): Authenticated) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: format!("Hello, {}! You are authenticated.", claims.sub),
    })
}
