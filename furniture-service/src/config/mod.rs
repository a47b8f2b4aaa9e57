use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct FurnitureConfig {
    pub common: core_config::Config,
    pub database: DatabaseConfig,
    pub store: StoreBackend,
}

/// Connection settings. Both values are optional outside production: without
/// them the service runs with an unavailable store.
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub name: Option<String>,
}

impl DatabaseConfig {
    pub fn url_is_set(&self) -> bool {
        self.url.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn name_is_set(&self) -> bool {
        self.name.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl FurnitureConfig {
    pub fn load() -> Result<Self, AppError> {
        // Handles .env, the optional configuration file and PORT
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(FurnitureConfig {
            common: common_config,
            database: DatabaseConfig {
                url: get_optional_env("DATABASE_URL", is_prod)?,
                name: get_optional_env("DATABASE_NAME", is_prod)?,
            },
            store: env::var("STORE_BACKEND")
                .unwrap_or_else(|_| "mongo".to_string())
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
        })
    }
}

fn get_optional_env(key: &str, is_prod: bool) -> Result<Option<String>, AppError> {
    match env::var(key) {
        Ok(val) if !val.is_empty() => Ok(Some(val)),
        _ if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        _ => Ok(None),
    }
}
