use std::time::Duration;

/// Default backend base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// A configuration value could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Backend client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash (default: `http://localhost:8000/api`).
    pub api_url: String,
    /// Bearer token sent with every request, if set.
    pub api_token: Option<String>,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults. A
    /// `.env` file in the working directory is read first if present.
    ///
    /// | Env Var                        | Default                     |
    /// |--------------------------------|-----------------------------|
    /// | `SIGNAGE_API_URL`              | `http://localhost:8000/api` |
    /// | `SIGNAGE_API_TOKEN`            | unset                       |
    /// | `SIGNAGE_REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!("Loaded .env file");
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_url = non_blank("SIGNAGE_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "SIGNAGE_API_URL",
                expected: "an http(s) URL",
                value: api_url,
            });
        }

        let api_token = non_blank("SIGNAGE_API_TOKEN").map(|t| t.trim().to_string());

        let request_timeout_secs = match non_blank("SIGNAGE_REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "SIGNAGE_REQUEST_TIMEOUT_SECS",
                        expected: "a positive integer",
                        value: raw,
                    })
                }
            },
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
