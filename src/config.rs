//! Runtime configuration
//!
//! Service credentials come from the environment and are mandatory: a missing
//! value is a startup failure, never something the fetch flow retries.

use crate::error::{DirectoryError, Result};
use reqwest::Url;
use secrecy::SecretString;
use std::time::Duration;

/// Environment variable holding the service base URL
pub const URL_ENV: &str = "SUPABASE_URL";
/// Environment variable holding the service access (anon) key
pub const KEY_ENV: &str = "SUPABASE_ANON_KEY";

/// Default quiescence interval for the search box
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Connection settings for the remote contacts service
#[derive(Debug)]
pub struct ServiceConfig {
    pub url: Url,
    pub api_key: SecretString,
}

impl ServiceConfig {
    /// Read both required values from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read both required values through `lookup`. Empty values count as
    /// missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, URL_ENV)?;
        let api_key = required(&lookup, KEY_ENV)?;

        let url = Url::parse(&url).map_err(|e| DirectoryError::InvalidConfig {
            key: URL_ENV,
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(DirectoryError::InvalidConfig {
                key: URL_ENV,
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(Self {
            url,
            api_key: SecretString::from(api_key),
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(DirectoryError::MissingConfig(key)),
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Table (PostgREST resource) holding the contacts
    pub table: String,
    /// How long the search input must stay unchanged before it is queried
    pub debounce: Duration,
    /// Per-request timeout for the remote service
    pub request_timeout: Duration,
    /// Query applied on mount
    pub initial_query: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table: "contacts".to_string(),
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: Duration::from_secs(30),
            initial_query: String::new(),
        }
    }
}
