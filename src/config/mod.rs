//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PLAN_GATE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use plan_gate::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod collaborator;
mod error;
mod gate;
mod host;
mod server;

pub use collaborator::CollaboratorConfig;
pub use error::{ConfigError, ValidationError};
pub use gate::GateConfig;
pub use host::HostConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Billing management API (billing identity, entitlements)
    pub billing: CollaboratorConfig,

    /// Usage metering API
    pub usage: CollaboratorConfig,

    /// Tracked feature and fallback policy
    #[serde(default)]
    pub gate: GateConfig,

    /// Host deny callback
    #[serde(default)]
    pub host: HostConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PLAN_GATE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PLAN_GATE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PLAN_GATE__BILLING__API_BASE_URL=...` -> `billing.api_base_url = ...`
    /// - `PLAN_GATE__GATE__USAGE_FALLBACK=optimistic` -> `gate.usage_fallback`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLAN_GATE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - URL formats, HTTPS in production
    /// - Timeout ranges
    /// - Non-blank tracked feature
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let production = self.is_production();
        self.server.validate()?;
        self.billing.validate("billing", production)?;
        self.usage.validate("usage", production)?;
        self.gate.validate()?;
        self.host.validate(production)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
