//! Gateway and playback configuration
//!
//! The library never reads the environment itself; the binary collects
//! values from flags, environment variables and an optional `.env` file and
//! hands a validated [`Config`] to the gateway.

use thiserror::Error;
use url::Url;

/// Default TMDB API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default TMDB image host.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Default host for the playback embed pages.
pub const DEFAULT_EMBED_BASE_URL: &str = "https://vidbinge.dev/embed";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Errors that can occur while validating configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// No API key was provided
    #[error("TMDB API key is not configured (set TMDB_API_KEY or pass --api-key)")]
    MissingApiKey,

    /// A base URL does not parse as an http(s) URL with a host
    #[error("Invalid {name} URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

/// Runtime configuration of the browser
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// TMDB API key
    pub api_key: String,
    /// TMDB API root
    pub api_base_url: String,
    /// Response language (e.g. `en-US`)
    pub language: String,
    /// Image host for posters and stills
    pub image_base_url: String,
    /// Host serving the embed pages a playback target points at
    pub embed_base_url: String,
}

impl Config {
    /// Creates a configuration with default hosts for the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            embed_base_url: DEFAULT_EMBED_BASE_URL.to_string(),
        }
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        for (name, value) in [
            ("API base", &self.api_base_url),
            ("image base", &self.image_base_url),
            ("embed base", &self.embed_base_url),
        ] {
            if !is_http_url(value) {
                return Err(ConfigError::InvalidUrl {
                    name,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Whether `value` parses as an absolute `http`/`https` URL with a host.
fn is_http_url(value: &str) -> bool {
    let Ok(parsed) = Url::parse(value) else {
        return false;
    };
    matches!(parsed.scheme(), "http" | "https")
        && parsed.host_str().is_some_and(|host| !host.is_empty())
}
