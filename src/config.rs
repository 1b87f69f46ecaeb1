//! Configuration types for braintrust-export
//!
//! Configuration is an explicit value built once at startup, validated, and then
//! passed to [`Exporter`](crate::Exporter). It can be deserialized from JSON/TOML
//! or read from the process environment with [`Config::from_env`].

use crate::error::{Error, Result};
use crate::types::ExportKind;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Environment variable holding the bearer credential
pub const ENV_API_KEY: &str = "BRAINTRUST_API_KEY";
/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "BRAINTRUST_API_URL";
/// Environment variable naming the project to export
pub const ENV_PROJECT_NAME: &str = "PROJECT_NAME";
/// Environment variable for the base export directory
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
/// Environment variable for the per-request timeout in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "EXPORT_REQUEST_TIMEOUT_SECS";
/// Environment variable for the number of items exported concurrently
pub const ENV_CONCURRENCY: &str = "EXPORT_CONCURRENCY";
/// Environment variable selecting the abort-on-first-failure policy
pub const ENV_FAIL_FAST: &str = "EXPORT_FAIL_FAST";

/// What to do when a single experiment/dataset fails to export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure, keep exporting the remaining items, report at the end (default)
    #[default]
    Continue,
    /// Stop the whole run at the first failed item
    AbortOnFirst,
}

/// Main configuration for an export run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Bearer credential sent with every request
    #[serde(skip_serializing, default)]
    pub api_key: String,

    /// API base URL (default: "https://api.braintrust.dev/v1")
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Name of the project to export (required)
    pub project_name: String,

    /// Base export directory (default: "./braintrust_exports")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Maximum number of items exported at once (default: 1, sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Item failure handling
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Kinds to export, in order (default: experiments then datasets)
    #[serde(default = "default_kinds")]
    pub kinds: Vec<ExportKind>,
}

impl Config {
    /// Create a configuration with defaults for everything but the credential and project
    pub fn new(api_key: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: default_api_url(),
            project_name: project_name.into(),
            output_dir: default_output_dir(),
            request_timeout: default_request_timeout(),
            concurrency: default_concurrency(),
            failure_policy: FailurePolicy::default(),
            kinds: default_kinds(),
        }
    }

    /// Read configuration from the process environment
    ///
    /// # Errors
    /// Returns [`Error::Config`] when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    ///
    /// Blank values are treated as unset. The result is validated before it is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY)
            .ok_or_else(|| Error::config(ENV_API_KEY, format!("{ENV_API_KEY} is not set")))?;
        let project_name = get(ENV_PROJECT_NAME).ok_or_else(|| {
            Error::config(ENV_PROJECT_NAME, format!("{ENV_PROJECT_NAME} is not set"))
        })?;

        let mut config = Self::new(api_key, project_name);

        if let Some(url) = get(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = get(ENV_REQUEST_TIMEOUT) {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::config(
                    ENV_REQUEST_TIMEOUT,
                    format!("{ENV_REQUEST_TIMEOUT} must be a whole number of seconds, got '{secs}'"),
                )
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = get(ENV_CONCURRENCY) {
            config.concurrency = n.parse().map_err(|_| {
                Error::config(
                    ENV_CONCURRENCY,
                    format!("{ENV_CONCURRENCY} must be a positive integer, got '{n}'"),
                )
            })?;
        }
        if let Some(flag) = get(ENV_FAIL_FAST) {
            if parse_bool(ENV_FAIL_FAST, &flag)? {
                config.failure_policy = FailurePolicy::AbortOnFirst;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that cannot be expressed in the type
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::config(ENV_API_KEY, "API key must not be empty"));
        }
        if self.project_name.trim().is_empty() {
            return Err(Error::config(ENV_PROJECT_NAME, "project name must not be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::config(ENV_OUTPUT_DIR, "output directory must not be empty"));
        }
        let url = url::Url::parse(&self.api_url).map_err(|e| {
            Error::config(ENV_API_URL, format!("invalid API URL '{}': {e}", self.api_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(
                ENV_API_URL,
                format!("API URL must use http or https, got '{}'", url.scheme()),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::config(ENV_REQUEST_TIMEOUT, "request timeout must be non-zero"));
        }
        if self.concurrency == 0 {
            return Err(Error::config(ENV_CONCURRENCY, "concurrency must be at least 1"));
        }
        if self.kinds.is_empty() {
            return Err(Error::Config {
                message: "at least one of experiments or datasets must be exported".to_string(),
                key: None,
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::config(
            key,
            format!("{key} must be true or false, got '{other}'"),
        )),
    }
}

fn default_api_url() -> String {
    "https://api.braintrust.dev/v1".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./braintrust_exports")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_concurrency() -> usize {
    1
}

fn default_kinds() -> Vec<ExportKind> {
    ExportKind::ALL.to_vec()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
