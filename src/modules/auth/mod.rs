pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_authz::{CredentialStore, TokenService};
use bookshelf_kernel::{settings::AuthSettings, InitCtx, Module};
use serde_json::json;

use routes::AuthState;

/// Auth module: password login and the bearer-protected greeting
pub struct AuthModule {
    state: AuthState,
}

impl AuthModule {
    pub fn new(tokens: TokenService, credentials: CredentialStore) -> Self {
        Self {
            state: AuthState {
                tokens: Arc::new(tokens),
                credentials: Arc::new(credentials),
            },
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(
            TokenService::from_settings(settings),
            CredentialStore::from_settings(settings),
        )
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.state.tokens
    }
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if self.state.credentials.is_empty() {
            tracing::warn!(module = self.name(), "no users configured, every login will fail");
        }
        tracing::info!(
            module = self.name(),
            users = self.state.credentials.len(),
            token_ttl_minutes = ctx.settings.auth.token_ttl_minutes,
            "auth module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/login": {
                    "post": {
                        "summary": "Exchange username and password for an access token",
                        "tags": ["Authentication"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Login" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Access token",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Token" }
                                    }
                                }
                            },
                            "401": {
                                "description": "Invalid username or password",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/protected": {
                    "get": {
                        "summary": "Greet the authenticated caller",
                        "tags": ["Protected"],
                        "security": [{ "bearerAuth": [] }],
                        "responses": {
                            "200": {
                                "description": "Greeting naming the token subject",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Message" }
                                    }
                                }
                            },
                            "401": {
                                "description": "Missing, expired or invalid token",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Login": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string" },
                            "password": { "type": "string", "format": "password" }
                        },
                        "required": ["username", "password"]
                    },
                    "Token": {
                        "type": "object",
                        "properties": {
                            "access_token": { "type": "string" },
                            "token_type": { "type": "string", "enum": ["bearer"] }
                        },
                        "required": ["access_token", "token_type"]
                    }
                }
            }
        }))
    }
}

/// Create the auth module from the configured secret, TTL, and users
pub fn create_module(settings: &AuthSettings) -> Arc<AuthModule> {
    Arc::new(AuthModule::from_settings(settings))
}
