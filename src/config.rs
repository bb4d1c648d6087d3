//! Process-wide client configuration.
//!
//! A [`Config`] is built once at startup, usually with [`Config::from_env`],
//! and passed by reference to everything that talks to the API.

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ANURA_API_KEY";

/// Environment variable holding an optional model override.
pub const MODEL_ENV: &str = "ANURA_MODEL";

/// Environment variable holding an optional base URL override.
pub const BASE_URL_ENV: &str = "ANURA_BASE_URL";

/// Base URL of the hosted Anura API.
pub const DEFAULT_BASE_URL: &str = "https://anura-testnet.lilypad.tech/api/v1/";

/// Model used when the model list cannot be fetched.
pub const DEFAULT_MODEL: &str = "qwen2.5:7b";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration shared by the transport, the model lister and the chat loop.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    model: Option<String>,
    base_url: Url,
    timeout: Duration,
    verbose: bool,
}

impl Config {
    /// Create a configuration with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::config("API key must not be empty"));
        }
        Ok(Self {
            api_key,
            model: None,
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        })
    }

    /// Read the configuration from the process environment.
    ///
    /// Fails with [`Error::Config`] when `ANURA_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let api_key = non_empty(API_KEY_ENV).ok_or_else(|| {
            Error::config(format!("{API_KEY_ENV} environment variable is not set"))
        })?;
        let mut config = Self::new(api_key)?;
        config.model = non_empty(MODEL_ENV);
        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            config.base_url = parse_base_url(&base_url)?;
        }
        Ok(config)
    }

    /// Sets the model override.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Sets the base URL of the API.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets whether stream diagnostics are reported at info level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The bearer token sent with every request.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The model override, if one was configured.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// The base URL of the API.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether verbose diagnostics are enabled.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// URL of the chat completions endpoint.
    pub fn completions_url(&self) -> Result<Url> {
        Ok(self.base_url.join("chat/completions")?)
    }

    /// URL of the models endpoint.
    pub fn models_url(&self) -> Result<Url> {
        Ok(self.base_url.join("models")?)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .finish()
    }
}

// Url::join drops the last path segment unless the base ends in a slash.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut base_url = base_url.trim().to_string();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    Ok(Url::parse(&base_url)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(API_KEY_ENV));

        let err = Config::from_lookup(lookup(&[(API_KEY_ENV, "  ")])).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn defaults_from_environment() {
        let config = Config::from_lookup(lookup(&[(API_KEY_ENV, "secret")])).unwrap();
        assert_eq!(config.api_key(), "secret");
        assert_eq!(config.model(), None);
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert!(!config.verbose());
        assert_eq!(
            config.completions_url().unwrap().as_str(),
            "https://anura-testnet.lilypad.tech/api/v1/chat/completions"
        );
        assert_eq!(
            config.models_url().unwrap().as_str(),
            "https://anura-testnet.lilypad.tech/api/v1/models"
        );
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_ENV, "secret"),
            (MODEL_ENV, "llama3.1:8b"),
            (BASE_URL_ENV, "http://localhost:8080/api"),
        ]))
        .unwrap();
        assert_eq!(config.model(), Some("llama3.1:8b"));
        assert_eq!(
            config.completions_url().unwrap().as_str(),
            "http://localhost:8080/api/chat/completions"
        );
    }

    #[test]
    fn debug_hides_api_key() {
        let config = Config::new("super-secret").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = Config::new("k").unwrap().with_base_url("not a url");
        assert!(matches!(result, Err(Error::Url { .. })));
    }
}
