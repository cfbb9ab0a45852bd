//! Client configuration.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `DOCCANO_`, e.g. `DOCCANO_BASE_URL`;
//!    nested keys use a double underscore, e.g. `DOCCANO_TASK__TIMEOUT_SECS`)
//! 2. Local config file (`./doccano.toml`)
//! 3. XDG config file (`~/.config/doccano/config.toml`)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! base_url = "https://doccano.example.com"
//! verify_tls = true
//! ca_bundle = "/etc/ssl/internal-ca.pem"  # optional
//! request_timeout_secs = 30
//! home = "/var/lib/doccano-client"        # optional
//!
//! [task]
//! poll_interval_secs = 1
//! timeout_secs = 300
//!
//! [retry]
//! max_retries = 3
//! min_delay_ms = 500
//! max_delay_ms = 10000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{DoccanoError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server root, without the `/v1` suffix.
    pub base_url: String,
    /// Verify server TLS certificates.
    pub verify_tls: bool,
    /// Extra PEM root certificate to trust.
    pub ca_bundle: Option<PathBuf>,
    pub request_timeout_secs: u64,
    /// Directory for local files such as exports.
    /// Defaults to the platform data directory.
    pub home: Option<PathBuf>,
    pub task: TaskConfig,
    pub retry: RetrySettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            verify_tls: true,
            ca_bundle: None,
            request_timeout_secs: 30,
            home: None,
            task: TaskConfig::default(),
            retry: RetrySettings::default(),
        }
    }
}

/// Polling options for server-side tasks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
            timeout_secs: 300,
        }
    }
}

impl TaskConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Backoff for retried GET requests. `max_retries = 0` disables retries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: usize,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl ClientConfig {
    /// Defaults pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration using the config crate's layered approach.
    pub fn load() -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "doccano") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("doccano.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./doccano.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // DOCCANO_BASE_URL -> base_url, DOCCANO_TASK__TIMEOUT_SECS -> task.timeout_secs
        builder = builder.add_source(
            Environment::with_prefix("DOCCANO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a single TOML file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: ClientConfig = ConfigBuilder::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that `base_url` is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| DoccanoError::Config(format!("base_url {:?}: {e}", self.base_url)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(DoccanoError::Config(format!(
                "base_url must use http or https, got {other}"
            ))),
        }
    }

    /// `base_url` without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Root of the versioned API.
    pub fn api_url(&self) -> String {
        format!("{}/v1", self.base_url())
    }

    /// Local directory for client files.
    pub fn home_dir(&self) -> PathBuf {
        self.home.clone().unwrap_or_else(|| {
            ProjectDirs::from("", "", "doccano")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".doccano"))
        })
    }

    /// Default target directory for exported datasets.
    pub fn exports_dir(&self) -> PathBuf {
        self.home_dir().join("exports")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.verify_tls);
        assert_eq!(config.task.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.task.timeout(), Duration::from_secs(300));
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn api_url_strips_trailing_slash() {
        let config = ClientConfig::new("https://doccano.example.com/");
        assert_eq!(config.base_url(), "https://doccano.example.com");
        assert_eq!(config.api_url(), "https://doccano.example.com/v1");
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        assert!(ClientConfig::new("https://d.example").validate().is_ok());
        assert!(matches!(
            ClientConfig::new("ftp://d.example").validate(),
            Err(DoccanoError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::new("not a url").validate(),
            Err(DoccanoError::Config(_))
        ));
    }

    #[test]
    fn home_dir_prefers_configured_path() {
        let mut config = ClientConfig::default();
        config.home = Some(PathBuf::from("/tmp/doccano-home"));
        assert_eq!(config.home_dir(), PathBuf::from("/tmp/doccano-home"));
        assert_eq!(
            config.exports_dir(),
            PathBuf::from("/tmp/doccano-home/exports")
        );
    }

    #[test]
    fn from_file_overrides_defaults_and_keeps_the_rest() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(
            file,
            r#"
base_url = "https://annotate.example.org"
verify_tls = false

[task]
timeout_secs = 20
"#
        )
        .expect("write config");

        let config = ClientConfig::from_file(file.path()).expect("config should load");
        assert_eq!(config.base_url, "https://annotate.example.org");
        assert!(!config.verify_tls);
        assert_eq!(config.task.timeout_secs, 20);
        assert_eq!(config.task.poll_interval_secs, 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn from_file_reports_invalid_base_url() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(file, r#"base_url = "mailto:someone""#).expect("write config");

        let err = ClientConfig::from_file(file.path()).expect_err("should fail");
        assert!(matches!(err, DoccanoError::Config(_)));
    }
}
