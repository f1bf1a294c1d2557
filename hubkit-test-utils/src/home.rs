//! HOME directory isolation for testing

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::env::EnvVarGuard;

/// Points `HOME` at a temporary directory and `XDG_CONFIG_HOME` at its
/// `.config` subdirectory until dropped
pub struct HomeEnvTestGuard {
  temp_dir: TempDir,
  _home: EnvVarGuard,
  _config_home: EnvVarGuard,
}

impl Default for HomeEnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl HomeEnvTestGuard {
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let config_home = temp_dir.path().join(".config");
    fs::create_dir_all(&config_home).expect("Failed to create config directory");

    let _home = EnvVarGuard::set("HOME", temp_dir.path());
    let _config_home = EnvVarGuard::set("XDG_CONFIG_HOME", &config_home);

    Self {
      temp_dir,
      _home,
      _config_home,
    }
  }

  /// The temporary HOME directory
  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }

  /// The temporary XDG config directory
  pub fn config_home(&self) -> PathBuf {
    self.temp_dir.path().join(".config")
  }

  /// Write `content` to a file relative to HOME, creating parent directories
  pub fn write_file(&self, relative_path: impl AsRef<Path>, content: &str) -> io::Result<PathBuf> {
    let path = self.temp_dir.path().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
  }

  /// Write `~/.netrc`
  pub fn write_netrc(&self, content: &str) -> io::Result<PathBuf> {
    self.write_file(".netrc", content)
  }
}
