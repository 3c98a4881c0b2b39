//! Configuration module for paydash-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;
pub mod runtime;

use crate::config::file::{DashboardConfig as FileDashboardConfig, FileConfig};
use crate::config::runtime::{DashboardConfig, IssuerConfig, ServerConfig, WalletConfig};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub issuer: IssuerConfig,
    pub wallet: WalletConfig,
    pub dashboard: DashboardConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Read, override, validate and convert the configuration file.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        Self::parse(&config_content, self.listen_override)
    }

    /// Reload the configuration (used during SIGHUP).
    ///
    /// Only the `[dashboard]` section of the result is applied at runtime.
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn parse(content: &str, listen_override: Option<SocketAddr>) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(content)?;

        if let Some(listen) = listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.wallet.address.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "wallet.address must not be empty".to_owned(),
        ));
    }
    if config.issuer.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "issuer.api_key must not be empty".to_owned(),
        ));
    }
    if matches!(&config.dashboard.treasury_address, Some(t) if t.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "dashboard.treasury_address must not be empty when set".to_owned(),
        ));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
        },
        issuer: IssuerConfig {
            base_url: with_trailing_slash(file_config.issuer.base_url),
            api_key: file_config.issuer.api_key,
            chain_id: file_config.issuer.chain_id,
            card_limit_cents: file_config.issuer.card_limit_cents,
        },
        wallet: WalletConfig {
            base_url: with_trailing_slash(file_config.wallet.base_url),
            api_key: file_config.wallet.api_key,
            address: file_config.wallet.address,
            chain: file_config.wallet.chain,
            token: file_config.wallet.token,
            owner_email: file_config.wallet.owner_email,
        },
        dashboard: convert_dashboard(file_config.dashboard),
    }
}

fn convert_dashboard(d: FileDashboardConfig) -> DashboardConfig {
    let defaults = DashboardConfig::default();
    DashboardConfig {
        treasury_address: d.treasury_address,
        payroll_backend_url: d.payroll_backend_url,
        settlement_policy: d.settlement_policy,
        bank_label: d.bank_label.unwrap_or(defaults.bank_label),
        employer_label: d.employer_label.unwrap_or(defaults.employer_label),
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Get the database URL from the environment, if any.
///
/// Without it the server keeps its key-value data in memory.
pub fn get_database_url() -> Option<String> {
    std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[issuer]
base_url = "https://api.issuer.test/v1"
api_key = "issuer-key"

[wallet]
base_url = "https://wallet.test/api/"
api_key = "wallet-key"
address = "0xABC"

[dashboard]
bank_label = "Test Bank"
"#;

    #[test]
    fn test_parse_applies_defaults_and_override() {
        let listen: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = ConfigLoader::parse(MINIMAL, Some(listen)).unwrap();

        assert_eq!(config.server.listen, listen);
        assert_eq!(config.issuer.base_url.as_str(), "https://api.issuer.test/v1/");
        assert_eq!(config.dashboard.bank_label, "Test Bank");
        assert_eq!(
            config.dashboard.employer_label,
            DashboardConfig::default().employer_label
        );
        assert_eq!(config.issuer.card_limit_cents, 100_000);
    }

    #[test]
    fn test_card_limit_is_read_from_issuer_section() {
        let content = MINIMAL.replace(
            "api_key = \"issuer-key\"",
            "api_key = \"issuer-key\"\ncard_limit_cents = 25000",
        );
        let config = ConfigLoader::parse(&content, None).unwrap();
        assert_eq!(config.issuer.card_limit_cents, 25_000);
    }

    #[test]
    fn test_empty_wallet_address_is_rejected() {
        let content = MINIMAL.replace("address = \"0xABC\"", "address = \"  \"");
        let err = ConfigLoader::parse(&content, None).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_missing_section_is_a_parse_error() {
        let err = ConfigLoader::parse("[server]\nlisten = \"0.0.0.0:1\"\n", None).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
