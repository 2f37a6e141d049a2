//! # API Configuration
//!
//! Where the storefront REST API lives and how to talk to it.

use std::time::Duration;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for the REST API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: Url,
    /// Applies to the whole request, connect to last byte.
    pub timeout: Duration,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub auth_token: Option<String>,
}

impl ApiConfig {
    /// Parses and checks the base URL.
    ///
    /// ```rust
    /// use evolv_client::ApiConfig;
    ///
    /// let config = ApiConfig::new("https://api.evolv.example/api").unwrap();
    /// assert_eq!(config.endpoint("promo/validate").unwrap().as_str(),
    ///            "https://api.evolv.example/api/promo/validate");
    ///
    /// assert!(ApiConfig::new("ftp://api.evolv.example").is_err());
    /// ```
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut url = Url::parse(base_url)?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                base_url
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!(
                "API URL cannot be used as a base: {}",
                base_url
            )));
        }

        // Url::join replaces the last segment unless the path ends with '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(ApiConfig {
            base_url: url,
            timeout: DEFAULT_TIMEOUT,
            auth_token: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path (no leading slash) against the base URL.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = ApiConfig::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            config.endpoint("/orders").unwrap().as_str(),
            "http://localhost:5000/api/orders"
        );

        let config = ApiConfig::new("http://localhost:5000").unwrap();
        assert_eq!(
            config.endpoint("products/whey-choc").unwrap().as_str(),
            "http://localhost:5000/products/whey-choc"
        );
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(ApiConfig::new("not a url").is_err());
        assert!(ApiConfig::new("ws://localhost:5000").is_err());
    }

    #[test]
    fn test_builders() {
        let config = ApiConfig::new("https://api.example.com")
            .unwrap()
            .with_timeout(Duration::from_secs(3))
            .with_auth_token("tok");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
    }
}
