// src/settings.rs
//! Process-wide configuration, read once at startup.
//!
//! Values come from the environment (a `.env` file is loaded first by `main`).
//! Keys are matched case-insensitively against the field names below, so
//! `FRAMER_SITE_ID` populates `framer_site_id`.
//!
//! Missing CMS credentials are not a startup failure: the server still comes up
//! and answers every verification request with a configuration error.

use config::{Config, ConfigError, Environment};
use reqwest::Url;
use serde::Deserialize;

/// Collection used when `FRAMER_COLLECTION_ID` is not set.
pub const DEFAULT_COLLECTION_ID: &str = "certificates";

/// Framer API host used when `FRAMER_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "https://api.framer.com";

/// Listen address used when `BIND_ADDR` is not set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Immutable service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Framer site identifier
    #[serde(default)]
    pub framer_site_id: Option<String>,

    /// Bearer token for the Framer API
    #[serde(default)]
    pub framer_api_key: Option<String>,

    /// Collection holding certificate records
    #[serde(default)]
    pub framer_collection_id: Option<String>,

    /// Comma-separated CORS allow-list
    #[serde(default)]
    pub allowed_origins: Option<String>,

    /// Base URL of the Framer API
    #[serde(default)]
    pub framer_api_base: Option<String>,

    /// Socket address the HTTP server binds to
    #[serde(default)]
    pub bind_addr: Option<String>,
}

/// Credentials needed to reach the collection store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramerCredentials {
    pub site_id: String,
    pub api_key: String,
    pub collection_id: String,
}

/// Treats empty strings the same as unset variables.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::default().try_parsing(false))
            .build()?;
        Self::from_config(config)
    }

    /// Builds settings from an already-assembled configuration.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }

    /// Returns CMS credentials if both the site id and the API key are set.
    pub fn credentials(&self) -> Option<FramerCredentials> {
        let site_id = non_empty(&self.framer_site_id)?;
        let api_key = non_empty(&self.framer_api_key)?;
        let collection_id = non_empty(&self.framer_collection_id).unwrap_or(DEFAULT_COLLECTION_ID);

        Some(FramerCredentials {
            site_id: site_id.to_string(),
            api_key: api_key.to_string(),
            collection_id: collection_id.to_string(),
        })
    }

    /// Raw CORS allow-list; empty when unset.
    pub fn allowed_origins(&self) -> &str {
        self.allowed_origins.as_deref().unwrap_or("")
    }

    /// Parsed Framer API base URL.
    ///
    /// Rejects URLs that cannot carry a path, such as `mailto:` addresses.
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        let raw = non_empty(&self.framer_api_base).unwrap_or(DEFAULT_API_BASE);
        let url = Url::parse(raw).map_err(|e| ConfigError::Message(format!("invalid FRAMER_API_BASE {:?}: {}", raw, e)))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::Message(format!("FRAMER_API_BASE {:?} cannot be used as a base URL", raw)));
        }
        Ok(url)
    }

    /// Listen address for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        non_empty(&self.bind_addr).unwrap_or(DEFAULT_BIND_ADDR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(pairs: &[(&str, &str)]) -> Settings {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Settings::from_config(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = settings_with(&[]);

        assert!(settings.credentials().is_none());
        assert_eq!(settings.allowed_origins(), "");
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.api_base().unwrap().as_str(), "https://api.framer.com/");
    }

    #[test]
    fn test_credentials_require_site_and_key() {
        let only_site = settings_with(&[("framer_site_id", "site-1")]);
        assert!(only_site.credentials().is_none());

        let empty_key = settings_with(&[("framer_site_id", "site-1"), ("framer_api_key", "")]);
        assert!(empty_key.credentials().is_none());

        let full = settings_with(&[("framer_site_id", "site-1"), ("framer_api_key", "secret")]);
        assert_eq!(
            full.credentials(),
            Some(FramerCredentials {
                site_id: "site-1".into(),
                api_key: "secret".into(),
                collection_id: DEFAULT_COLLECTION_ID.into(),
            })
        );
    }

    #[test]
    fn test_collection_override() {
        let settings = settings_with(&[
            ("framer_site_id", "site-1"),
            ("framer_api_key", "secret"),
            ("framer_collection_id", "diplomas"),
        ]);
        assert_eq!(settings.credentials().unwrap().collection_id, "diplomas");
    }

    #[test]
    fn test_invalid_api_base_is_rejected() {
        let settings = settings_with(&[("framer_api_base", "not a url")]);
        assert!(settings.api_base().is_err());
    }

    #[test]
    fn test_api_base_must_accept_a_path() {
        let settings = settings_with(&[("framer_api_base", "mailto:someone@example.com")]);
        let err = settings.api_base().unwrap_err();
        assert!(err.to_string().contains("cannot be used as a base URL"));

        let settings = settings_with(&[("framer_api_base", "http://127.0.0.1:8080/framer")]);
        assert_eq!(settings.api_base().unwrap().path(), "/framer");
    }
}
