//! Provider configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Default deployment API base, without the `/deployments` collection path.
pub const DEFAULT_BASE_URL: &str = "https://api.elastic-cloud.com/api/v1";

/// Default name of the orchestration flag stripped on create and defaulted
/// on update.
pub const DEFAULT_PRUNE_ORPHANS_FIELD: &str = "prune_orphans";

/// Upper bound, in seconds, for every configured duration.
pub const MAX_DURATION_SECS: u64 = 86_400;

/// Provider settings derived from environment variables, configuration
/// files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "EC",
    discovery(
        app_name = "ecdeploy",
        env_var = "ECDEPLOY_CONFIG_PATH",
        config_file_name = "ecdeploy.toml",
        dotfile_name = ".ecdeploy.toml",
        project_file_name = "ecdeploy.toml"
    )
)]
pub struct ProviderConfig {
    /// Base URL of the deployment API. Requests target
    /// `<base_url>/deployments`.
    #[ortho_config(default = DEFAULT_BASE_URL.to_owned())]
    pub base_url: String,
    /// Name of the orchestration flag in deployment configurations.
    #[ortho_config(default = DEFAULT_PRUNE_ORPHANS_FIELD.to_owned())]
    pub prune_orphans_field: String,
    /// Upper bound for a single HTTP request, in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Whether delete waits for the shutdown to complete.
    #[ortho_config(default = false)]
    pub wait_for_shutdown: bool,
    /// Delay between status checks while waiting for shutdown, in seconds.
    #[ortho_config(default = 5)]
    pub shutdown_poll_interval_secs: u64,
    /// Maximum time to wait for shutdown to complete, in seconds.
    #[ortho_config(default = 600)]
    pub shutdown_wait_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            prune_orphans_field: DEFAULT_PRUNE_ORPHANS_FIELD.to_owned(),
            request_timeout_secs: 30,
            wait_for_shutdown: false,
            shutdown_poll_interval_secs: 5,
            shutdown_wait_timeout_secs: 600,
        }
    }
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn message(&self, problem: &str) -> String {
        format!(
            "{problem} {}: set {} or add {} to ecdeploy.toml",
            self.description, self.env_var, self.toml_key
        )
    }
}

const BASE_URL: FieldMetadata =
    FieldMetadata::new("deployment API base URL", "EC_BASE_URL", "base_url");
const PRUNE_ORPHANS_FIELD: FieldMetadata = FieldMetadata::new(
    "orchestration flag name",
    "EC_PRUNE_ORPHANS_FIELD",
    "prune_orphans_field",
);
const REQUEST_TIMEOUT: FieldMetadata = FieldMetadata::new(
    "request timeout",
    "EC_REQUEST_TIMEOUT_SECS",
    "request_timeout_secs",
);
const POLL_INTERVAL: FieldMetadata = FieldMetadata::new(
    "shutdown poll interval",
    "EC_SHUTDOWN_POLL_INTERVAL_SECS",
    "shutdown_poll_interval_secs",
);
const WAIT_TIMEOUT: FieldMetadata = FieldMetadata::new(
    "shutdown wait timeout",
    "EC_SHUTDOWN_WAIT_TIMEOUT_SECS",
    "shutdown_wait_timeout_secs",
);

impl ProviderConfig {
    fn require_text(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(metadata.message("missing")));
        }
        Ok(())
    }

    fn require_duration(value: u64, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::MissingField(metadata.message("zero")));
        }
        if value > MAX_DURATION_SECS {
            return Err(ConfigError::OutOfRange(format!(
                "{} (at most {MAX_DURATION_SECS} seconds)",
                metadata.message("excessive")
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("ecdeploy")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Parses the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the value is blank and
    /// [`ConfigError::InvalidUrl`] when it does not parse as an absolute URL.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        Self::require_text(&self.base_url, &BASE_URL)?;
        Url::parse(self.base_url.trim()).map_err(|err| ConfigError::InvalidUrl {
            value: self.base_url.clone(),
            message: err.to_string(),
        })
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Shutdown poll interval as a [`Duration`].
    #[must_use]
    pub const fn shutdown_poll_interval(&self) -> Duration {
        Duration::from_secs(self.shutdown_poll_interval_secs)
    }

    /// Shutdown wait timeout as a [`Duration`].
    #[must_use]
    pub const fn shutdown_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_wait_timeout_secs)
    }

    /// Performs semantic validation. Error messages include guidance on how
    /// to provide values via environment variables or configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a field is blank, zero, too large, or
    /// unparseable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url()?;
        Self::require_text(&self.prune_orphans_field, &PRUNE_ORPHANS_FIELD)?;
        Self::require_duration(self.request_timeout_secs, &REQUEST_TIMEOUT)?;
        Self::require_duration(self.shutdown_poll_interval_secs, &POLL_INTERVAL)?;
        Self::require_duration(self.shutdown_wait_timeout_secs, &WAIT_TIMEOUT)?;
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty, zero, or missing.
    #[error("invalid configuration field: {0}")]
    MissingField(String),
    /// Raised when a duration exceeds [`MAX_DURATION_SECS`].
    #[error("invalid configuration field: {0}")]
    OutOfRange(String),
    /// Raised when the base URL cannot be parsed.
    #[error("invalid base URL `{value}`: {message}")]
    InvalidUrl {
        /// Value supplied by the operator.
        value: String,
        /// Parser error message.
        message: String,
    },
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}
