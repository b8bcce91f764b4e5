//! Client configuration: where the backend lives and how to authenticate.
//!
//! All connection behaviour is controlled through [`ClientConfig`], built
//! via [`ClientConfig::builder()`] or read from the environment once at
//! startup with [`ClientConfig::from_env()`]. The config is immutable for
//! the process lifetime and passed by reference into every operation —
//! there is deliberately no module-level base URL or ambient key lookup.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// Environment variable holding the backend base URL.
pub const ENV_BASE_URL: &str = "DRAW2GLB_API_BASE_URL";

/// Environment variable holding the optional bearer credential.
pub const ENV_API_KEY: &str = "DRAW2GLB_API_KEY";

/// Connection settings for the draw2glb backend.
///
/// # Example
/// ```rust
/// use draw2glb_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://api.example.com/")
///     .api_key("sk-secret")
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint("/health"), "https://api.example.com/health");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, stored without trailing slashes.
    ///
    /// Every request path is `base_url + suffix`; stripping trailing
    /// slashes at construction keeps the join free of `//` regardless of
    /// how the operator wrote the URL.
    pub base_url: String,

    /// Optional bearer credential.
    ///
    /// When set (and non-empty after trimming), every request carries
    /// `Authorization: Bearer <key>`. A blank value behaves exactly like
    /// an absent one.
    pub api_key: Option<String>,

    /// Overall per-request timeout in seconds for ingest/parse/build.
    /// Default: `None` — those calls rely on the transport's default
    /// behaviour. The warm-up round trip is always bounded separately
    /// (see [`crate::client::WARMUP_TIMEOUT_SECS`]).
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read the configuration from `DRAW2GLB_API_BASE_URL` and
    /// `DRAW2GLB_API_KEY`.
    ///
    /// Intended to be called once at startup; the result is then passed
    /// around by reference. Fails with [`ClientError::MissingBaseUrl`] when
    /// the base URL variable is unset or blank.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var(ENV_BASE_URL).unwrap_or_default();
        let api_key = std::env::var(ENV_API_KEY).ok();
        Self::builder()
            .base_url(base_url)
            .maybe_api_key(api_key)
            .build()
    }

    /// Join an endpoint suffix onto the base URL.
    ///
    /// `suffix` is expected to start with `/` (all backend paths do); the
    /// base was stripped of trailing slashes at construction, so the result
    /// always has exactly one separator.
    pub fn endpoint(&self, suffix: &str) -> String {
        debug_assert!(suffix.starts_with('/'), "endpoint suffix must start with '/'");
        format!("{}{}", self.base_url, suffix)
    }

    /// The bearer credential, if one is configured and non-blank.
    pub fn bearer(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the backend base URL. Trailing slashes are stripped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.config.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer credential.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into().trim().to_string());
        self
    }

    /// Set the bearer credential from an `Option` (env lookups).
    pub fn maybe_api_key(mut self, key: Option<String>) -> Self {
        self.config.api_key = key.map(|k| k.trim().to_string());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// An absent base URL is a configuration error, not something any
    /// operation should discover mid-flight and retry.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        if self.config.base_url.is_empty() {
            return Err(ClientError::MissingBaseUrl);
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let c = ClientConfig::builder()
            .base_url("https://api.example.com///")
            .build()
            .unwrap();
        assert_eq!(c.base_url, "https://api.example.com");
        assert_eq!(c.endpoint("/ingest"), "https://api.example.com/ingest");
    }

    #[test]
    fn endpoint_join_has_single_separator() {
        for base in ["http://h", "http://h/", "http://h//"] {
            let c = ClientConfig::builder().base_url(base).build().unwrap();
            assert_eq!(c.endpoint("/health"), "http://h/health");
        }
    }

    #[test]
    fn empty_base_url_is_a_config_error() {
        let err = ClientConfig::builder().base_url("   ").build().unwrap_err();
        assert!(matches!(err, ClientError::MissingBaseUrl));
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let c = ClientConfig::builder()
            .base_url("http://h")
            .api_key("   ")
            .build()
            .unwrap();
        assert_eq!(c.bearer(), None);

        let c = ClientConfig::builder()
            .base_url("http://h")
            .api_key(" sk-abc ")
            .build()
            .unwrap();
        assert_eq!(c.bearer(), Some("sk-abc"));
    }
}
