//! Configuration file support for branchsync.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags (`--timeout`)
//! 2. Environment variables (prefixed with `BRANCHSYNC_`, nested keys joined
//!    with `__`, e.g. `BRANCHSYNC_GITHUB__TOKEN`)
//! 3. Config file (`./config.yml`, or the path given with `-f`)
//! 4. Built-in defaults
//!
//! A `.env` file in the current directory is read into the environment first.
//!
//! Example config file:
//! ```yaml
//! github:
//!   token: ghp_...          # or BRANCHSYNC_GITHUB__TOKEN
//!   user: octocat
//! codeberg:
//!   token: ...              # or BRANCHSYNC_CODEBERG__TOKEN
//!   user: octocat
//!   api_base: https://codeberg.org/api/v1   # optional
//! repositories:
//!   - github: hello-world
//!     codeberg: hello-world
//! http:
//!   timeout_secs: 30        # optional
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use branchsync::forge::{CODEBERG_API_BASE, Dialect, GITHUB_API_BASE};
use branchsync::sync::{Credentials, RepositoryPair};
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config as Settings, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file path, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = branchsync::DEFAULT_TIMEOUT.as_secs();

const ENV_PREFIX: &str = "BRANCHSYNC";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at '{}'; use --generate-config to create it", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("missing required config value '{0}'")]
    Missing(String),

    #[error("invalid config value '{field}': {reason}")]
    Invalid { field: String, reason: String },

    #[error("failed to write config template to '{}': {message}", .path.display())]
    Template { path: PathBuf, message: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source remote (GitHub).
    pub github: RemoteConfig,
    /// Mirror remote (Codeberg).
    pub codeberg: RemoteConfig,
    /// Repository pairs to synchronize, in order.
    pub repositories: Vec<RepositoryConfig>,
    /// HTTP client settings.
    pub http: HttpConfig,
}

/// Account on one remote.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API token, forwarded verbatim in the `Authorization` header.
    pub token: String,
    /// Account that owns the repositories.
    pub user: String,
    /// API base URL override, for self-hosted instances and tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl RemoteConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.user.trim(), self.token.trim())
    }

    /// The remote's dialect with the configured base URL applied.
    pub fn dialect(&self, default: Dialect) -> Dialect {
        match self.api_base.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => default.with_api_base(base),
            _ => default,
        }
    }
}

/// One mirrored repository: its name on GitHub and on Codeberg.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub github: String,
    pub codeberg: String,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load and validate the configuration at `path`, with environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        tracing::debug!("Loading config from {:?}", path);
        let builder = Settings::builder()
            .add_source(File::from(path).format(FileFormat::Yaml).required(true))
            .add_source(environment());
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that everything a run needs is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, remote) in [("github", &self.github), ("codeberg", &self.codeberg)] {
            if remote.token.trim().is_empty() {
                return Err(ConfigError::Missing(format!("{name}.token")));
            }
            if remote.user.trim().is_empty() {
                return Err(ConfigError::Missing(format!("{name}.user")));
            }
            if let Some(base) = &remote.api_base
                && !(base.starts_with("https://") || base.starts_with("http://"))
            {
                return Err(ConfigError::Invalid {
                    field: format!("{name}.api_base"),
                    reason: format!("'{base}' is not an http(s) URL"),
                });
            }
        }

        if self.repositories.is_empty() {
            return Err(ConfigError::Missing("repositories".to_string()));
        }
        for (i, repo) in self.repositories.iter().enumerate() {
            if repo.github.trim().is_empty() {
                return Err(ConfigError::Missing(format!("repositories[{i}].github")));
            }
            if repo.codeberg.trim().is_empty() {
                return Err(ConfigError::Missing(format!("repositories[{i}].codeberg")));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "http.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Repository pairs in configuration order.
    pub fn pairs(&self) -> Vec<RepositoryPair> {
        self.repositories
            .iter()
            .map(|r| RepositoryPair::new(r.github.trim(), r.codeberg.trim()))
            .collect()
    }

    /// Request timeout, with `--timeout` taking precedence.
    pub fn timeout(&self, override_secs: Option<u64>) -> Duration {
        Duration::from_secs(override_secs.unwrap_or(self.http.timeout_secs))
    }

    /// Placeholder configuration written by `--generate-config`.
    pub fn template() -> Self {
        Self {
            github: RemoteConfig {
                token: "ghp_yourgithubtokenhere".to_string(),
                user: "github_username".to_string(),
                api_base: None,
            },
            codeberg: RemoteConfig {
                token: "codeberg_api_token_here".to_string(),
                user: "codeberg_username".to_string(),
                api_base: None,
            },
            repositories: vec![
                RepositoryConfig {
                    github: "repo1".to_string(),
                    codeberg: "repo1".to_string(),
                },
                RepositoryConfig {
                    github: "repo2".to_string(),
                    codeberg: "repo2".to_string(),
                },
            ],
            http: HttpConfig::default(),
        }
    }

    /// Write the template to `path`.
    ///
    /// Returns `Ok(false)` without touching the file if it already exists.
    pub fn write_template(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }

        let template_error = |message: String| ConfigError::Template {
            path: path.to_path_buf(),
            message,
        };

        let body =
            serde_yaml_ng::to_string(&Self::template()).map_err(|e| template_error(e.to_string()))?;
        let content = format!(
            "# branchsync configuration\n\
             # Optional per-remote `api_base` overrides the API URL \
             (defaults: {GITHUB_API_BASE}, {CODEBERG_API_BASE}).\n{body}"
        );

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| template_error(e.to_string()))?;
        }
        fs::write(path, content).map_err(|e| template_error(e.to_string()))?;
        Ok(true)
    }
}

/// Environment variable source: `BRANCHSYNC_GITHUB__TOKEN` -> `github.token`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
