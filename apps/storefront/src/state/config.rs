//! # Storefront Configuration
//!
//! Loaded once at startup, read-only afterwards.
//!
//! ## Configuration Sources (later wins)
//! 1. Defaults (this file)
//! 2. Config file (`storefront.toml` in the platform config dir, or `--config`)
//! 3. Environment variables (`EVOLV_*`)
//!
//! ```toml
//! [api]
//! base_url = "https://api.evolv.example/api"
//! timeout_secs = 15
//! auth_token = "..."
//!
//! [pricing]
//! free_shipping_threshold = 1000   # rupees
//! flat_shipping_fee = 50           # rupees
//! tax_rate_bps = 800               # 8%
//! currency_symbol = "₹"
//!
//! [storage]
//! database_path = "/var/lib/evolv/storefront.db"   # or ":memory:"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use evolv_client::ApiConfig;
use evolv_core::{Money, PricingPolicy, TaxRate};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Path value selecting a throwaway in-memory database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: {reason}")]
    Env { name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
}

impl Default for ApiSection {
    fn default() -> Self {
        ApiSection {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 15,
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    /// Whole rupees.
    pub free_shipping_threshold: i64,
    /// Whole rupees.
    pub flat_shipping_fee: i64,
    pub tax_rate_bps: u32,
    pub currency_symbol: String,
}

impl Default for PricingSection {
    fn default() -> Self {
        let policy = PricingPolicy::default();
        PricingSection {
            free_shipping_threshold: policy.free_shipping_threshold.rupees(),
            flat_shipping_fee: policy.flat_shipping_fee.rupees(),
            tax_rate_bps: policy.tax_rate.bps(),
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Defaults to `storefront.db` in the platform data directory.
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// StorefrontConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub api: ApiSection,
    pub pricing: PricingSection,
    pub storage: StorageSection,
}

impl StorefrontConfig {
    /// Loads configuration from every source and validates it.
    ///
    /// An explicit `path` must exist. Without one, the platform config file
    /// is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file, using defaults");
                    StorefrontConfig::default()
                }
            },
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Applies `EVOLV_*` overrides.
    ///
    /// ## Environment Variables
    /// - `EVOLV_API_URL`: API base URL
    /// - `EVOLV_AUTH_TOKEN`: bearer token
    /// - `EVOLV_DB_PATH`: database file (or `:memory:`)
    /// - `EVOLV_TAX_RATE_BPS`: tax rate in basis points
    /// - `EVOLV_REQUEST_TIMEOUT_SECS`: per-request timeout
    ///
    /// `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("EVOLV_API_URL") {
            self.api.base_url = url;
        }
        if let Some(token) = lookup("EVOLV_AUTH_TOKEN") {
            self.api.auth_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(path) = lookup("EVOLV_DB_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }
        if let Some(bps) = lookup("EVOLV_TAX_RATE_BPS") {
            self.pricing.tax_rate_bps = parse_env("EVOLV_TAX_RATE_BPS", &bps)?;
        }
        if let Some(secs) = lookup("EVOLV_REQUEST_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_env("EVOLV_REQUEST_TIMEOUT_SECS", &secs)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_config()?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.pricing.free_shipping_threshold < 0 || self.pricing.flat_shipping_fee < 0 {
            return Err(ConfigError::Invalid(
                "shipping amounts cannot be negative".to_string(),
            ));
        }
        if self.pricing.tax_rate_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "pricing.tax_rate_bps must be at most 10000, got {}",
                self.pricing.tax_rate_bps
            )));
        }
        Ok(())
    }

    /// Connection settings for the REST clients.
    pub fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        let config = ApiConfig::new(&self.api.base_url)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?
            .with_timeout(Duration::from_secs(self.api.timeout_secs));

        Ok(match &self.api.auth_token {
            Some(token) => config.with_auth_token(token.clone()),
            None => config,
        })
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            free_shipping_threshold: Money::from_rupees(self.pricing.free_shipping_threshold),
            flat_shipping_fee: Money::from_rupees(self.pricing.flat_shipping_fee),
            tax_rate: TaxRate::from_bps(self.pricing.tax_rate_bps),
        }
    }

    /// Resolves the database file, creating the platform data directory
    /// when the default location is used.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.evolv.storefront/storefront.db`
    /// - **Windows**: `%APPDATA%\evolv\storefront\data\storefront.db`
    /// - **Linux**: `~/.local/share/storefront/storefront.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        Ok(data_dir.join("storefront.db"))
    }

    /// Formats paise as a currency string.
    ///
    /// ```rust
    /// use evolv_core::Money;
    /// use evolv_storefront::state::StorefrontConfig;
    ///
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(Money::from_paise(83292)), "₹832.92");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.pricing.currency_symbol,
            amount.rupees().abs(),
            amount.paise_part().abs()
        )
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "evolv", "storefront")
}

/// `storefront.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn parse_env<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        name: name.to_string(),
        reason: format!("'{}': {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_pricing_rules() {
        let config = StorefrontConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing_policy(), PricingPolicy::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://api.evolv.example/api"

[pricing]
tax_rate_bps = 1200
"#
        )
        .unwrap();

        let config = StorefrontConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://api.evolv.example/api");
        // Unset keys keep their defaults
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.pricing.flat_shipping_fee, 50);
        assert_eq!(config.pricing_policy().tax_rate, TaxRate::from_bps(1200));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = StorefrontConfig::default();
        config
            .apply_env(env(&[
                ("EVOLV_API_URL", "https://staging.evolv.example/api"),
                ("EVOLV_AUTH_TOKEN", "tok"),
                ("EVOLV_DB_PATH", IN_MEMORY_DATABASE),
                ("EVOLV_TAX_RATE_BPS", "500"),
                ("EVOLV_REQUEST_TIMEOUT_SECS", "3"),
            ]))
            .unwrap();

        assert_eq!(config.api.base_url, "https://staging.evolv.example/api");
        assert_eq!(config.pricing.tax_rate_bps, 500);
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from(IN_MEMORY_DATABASE)
        );

        let api = config.api_config().unwrap();
        assert_eq!(api.auth_token.as_deref(), Some("tok"));
        assert_eq!(api.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let mut config = StorefrontConfig::default();
        let err = config
            .apply_env(env(&[("EVOLV_TAX_RATE_BPS", "eight")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { ref name, .. } if name == "EVOLV_TAX_RATE_BPS"));
    }

    #[test]
    fn test_validation() {
        let mut config = StorefrontConfig::default();
        config.api.base_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.pricing.tax_rate_bps = 20_000;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pricing\ntax_rate_bps = ").unwrap();

        let err = StorefrontConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_format_currency() {
        let config = StorefrontConfig::default();
        assert_eq!(config.format_currency(Money::from_rupees(769)), "₹769.00");
        assert_eq!(config.format_currency(Money::from_paise(5)), "₹0.05");
        assert_eq!(config.format_currency(Money::from_paise(-6392)), "-₹63.92");
    }
}
