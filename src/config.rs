use crate::{
    auth::{
        config::{JwtConfig, MAX_TOKEN_TTL_HOURS, OAuthConfig},
        jwt::decode_secret,
    },
    database::config::DatabaseConfig,
    jobs::JobsConfig,
    server::config::{FrontendConfig, LoggingConfig, ServerConfig},
    storage::StorageConfig,
};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "TRANQUIL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults, then `config.yaml` in the working directory, then `TRANQUIL_*` variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Path::new("config.yaml").exists().then_some(Path::new("config.yaml")))
    }

    /// Like [`Config::load`] with an explicit file; a missing file falls back to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        Self::build(path.exists().then_some(path))
    }

    fn build(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(ConfigBuilder::try_from(&Config::default())?);

        if let Some(file) = file {
            builder = builder.add_source(File::from(file));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret is required (base64 encoded)".to_string(),
            ));
        }
        decode_secret(&self.jwt.secret)
            .map_err(|e| ConfigError::Message(format!("jwt.secret is invalid: {}", e)))?;

        if self.jwt.token_ttl().is_none() {
            return Err(ConfigError::Message(format!(
                "jwt.token_ttl_hours must be between 1 and {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Message(
                "server.port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
