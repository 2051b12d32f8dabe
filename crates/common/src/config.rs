//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// CMS (item store) configuration.
    pub cms: CmsConfig,
    /// Admin authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Outbound email configuration. Reminder mails are logged instead of
    /// sent when absent.
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this portal, used when building navigable links.
    pub url: String,
}

/// CMS connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CmsConfig {
    /// Base URL of the Directus-style item store.
    pub url: String,
    /// Static access token for server-to-server reads (optional; public
    /// collections work without one).
    #[serde(default)]
    pub static_token: Option<String>,
    /// Default width query parameter applied to poster asset URLs.
    #[serde(default = "default_asset_width")]
    pub asset_width: u32,
}

/// Admin authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Accept the built-in development credential pair without contacting
    /// the CMS. Opt-in only; must never be enabled in production.
    #[serde(default)]
    pub dev_bypass: bool,
    /// Admin token cookie lifetime in days.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
    /// Admin token cookie lifetime in days when "remember me" is requested.
    #[serde(default = "default_remember_ttl_days")]
    pub remember_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            dev_bypass: false,
            token_ttl_days: default_token_ttl_days(),
            remember_ttl_days: default_remember_ttl_days(),
        }
    }
}

/// SMTP configuration for reminder email delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP host.
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// From address.
    pub from_address: String,
    /// From display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_asset_width() -> u32 {
    800
}

const fn default_token_ttl_days() -> i64 {
    1
}

const fn default_remember_ttl_days() -> i64 {
    7
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Pusat Prestasi Mahasiswa".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `PUSPRESMA_ENV`)
    /// 3. Environment variables with `PUSPRESMA_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("PUSPRESMA_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PUSPRESMA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("PUSPRESMA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
