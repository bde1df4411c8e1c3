use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSHELF_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSHELF";

/// Signing secret used when nothing else is configured. Refused in production.
pub const DEVELOPMENT_JWT_SECRET: &str = "bookshelf-development-secret-change-me";

/// Upper bound for `auth.token_ttl_minutes`: one year.
pub const MAX_TOKEN_TTL_MINUTES: u64 = 365 * 24 * 60;

const REDACTED: &str = "********";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// and `BOOKSHELF_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit config directory and environment
    /// name. Environment variables still take precedence over files.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let environment: Environment = environment.parse()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment_name(&environment)));

        let cfg = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment wins over anything written in the files.
        settings.environment = environment;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret must not be empty");
        }
        if self.environment == Environment::Production
            && self.auth.jwt_secret == DEVELOPMENT_JWT_SECRET
        {
            bail!("auth.jwt_secret must be overridden in production");
        }
        if self.auth.token_ttl_minutes == 0 {
            bail!("auth.token_ttl_minutes must be greater than zero");
        }
        if self.auth.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            bail!("auth.token_ttl_minutes must not exceed {MAX_TOKEN_TTL_MINUTES}");
        }
        Ok(())
    }

    /// Settings as JSON with the signing secret and passwords masked.
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(auth) = value.get_mut("auth") {
            auth["jwt_secret"] = serde_json::Value::String(REDACTED.to_string());
            if let Some(users) = auth.get_mut("users").and_then(|u| u.as_object_mut()) {
                for password in users.values_mut() {
                    *password = serde_json::Value::String(REDACTED.to_string());
                }
            }
        }
        value
    }
}

fn environment_name(environment: &Environment) -> &'static str {
    match environment {
        Environment::Local => "local",
        Environment::Staging => "staging",
        Environment::Production => "production",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "AuthSettings::default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "AuthSettings::default_token_ttl_minutes")]
    pub token_ttl_minutes: u64,
    /// Username to plaintext password.
    #[serde(default = "AuthSettings::default_users")]
    pub users: BTreeMap<String, String>,
}

impl AuthSettings {
    fn default_jwt_secret() -> String {
        DEVELOPMENT_JWT_SECRET.to_string()
    }

    fn default_token_ttl_minutes() -> u64 {
        30
    }

    fn default_users() -> BTreeMap<String, String> {
        BTreeMap::from([("johndoe".to_string(), "secretpassword".to_string())])
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: Self::default_jwt_secret(),
            token_ttl_minutes: Self::default_token_ttl_minutes(),
            users: Self::default_users(),
        }
    }
}
