//! # Client Configuration
//!
//! Settings for building a client: API base URL, access token and user
//! agent. Values come from `config.toml` in the project config directory,
//! then a `.netrc` token when the file has none, then the environment.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::{env, fmt, fs};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::auth::token_from_netrc;
use crate::consts::{API_BASE_URL, USER_AGENT};

/// Overrides the API base URL
pub const ENV_API_URL: &str = "GITHUB_API_URL";
/// Overrides the access token
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";

pub(crate) static DEFAULT_BASE_URL: LazyLock<Url> =
  LazyLock::new(|| Url::parse(API_BASE_URL).expect("default GitHub API URL is valid"));

/// Configuration for a [`BasicGitHubClient`](crate::client::BasicGitHubClient)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  pub base_url: Url,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub access_token: Option<String>,
  pub user_agent: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.clone(),
      access_token: None,
      user_agent: USER_AGENT.to_string(),
    }
  }
}

impl fmt::Debug for ClientConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ClientConfig")
      .field("base_url", &self.base_url.as_str())
      .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
      .field("user_agent", &self.user_agent)
      .finish()
  }
}

impl ClientConfig {
  /// Path of `config.toml` in the platform config directory
  pub fn default_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("dev", "hubkit", "hubkit").context("Failed to determine project directories")?;
    Ok(proj_dirs.config_dir().join("config.toml"))
  }

  /// Load the configuration from the default locations
  pub fn load() -> Result<Self> {
    let path = Self::default_path()?;
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    Self::load_layered(&path, home.as_deref())
  }

  /// Load `path`, fill a missing token from `home/.netrc`, then apply the
  /// environment overrides
  pub fn load_layered(path: &Path, home: Option<&Path>) -> Result<Self> {
    let mut config = Self::load_from(path)?;

    if config.access_token.is_none()
      && let Some(home) = home
    {
      config.access_token = token_from_netrc(home)?;
    }

    config.apply_env_overrides()?;
    Ok(config)
  }

  /// Read a config file. A missing file yields the defaults.
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!("No config file at {}, using defaults", path.display());
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: Self =
      toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?;
    Ok(config)
  }

  /// Apply `GITHUB_API_URL` and `GITHUB_TOKEN`. Empty values are ignored.
  pub fn apply_env_overrides(&mut self) -> Result<()> {
    if let Some(base_url) = non_empty_var(ENV_API_URL) {
      self.base_url = Url::parse(&base_url).with_context(|| format!("{ENV_API_URL} is not a valid URL: {base_url}"))?;
    }
    if let Some(token) = non_empty_var(ENV_TOKEN) {
      self.access_token = Some(token);
    }
    Ok(())
  }

  /// Write the configuration as TOML, creating parent directories
  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(path, content).with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|value| !value.is_empty())
}
