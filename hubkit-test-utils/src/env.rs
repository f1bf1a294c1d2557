//! Scoped environment variable overrides

use std::env;
use std::ffi::{OsStr, OsString};

/// Sets or removes one environment variable and restores its previous value
/// when dropped
#[must_use = "the variable is restored as soon as the guard is dropped"]
pub struct EnvVarGuard {
  name: OsString,
  original: Option<OsString>,
}

impl EnvVarGuard {
  /// Set `name` to `value` for the lifetime of the guard
  pub fn set(name: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
    let guard = Self::capture(name.as_ref());
    unsafe {
      env::set_var(&guard.name, value);
    }
    guard
  }

  /// Remove `name` for the lifetime of the guard
  pub fn remove(name: impl AsRef<OsStr>) -> Self {
    let guard = Self::capture(name.as_ref());
    unsafe {
      env::remove_var(&guard.name);
    }
    guard
  }

  fn capture(name: &OsStr) -> Self {
    Self {
      name: name.to_os_string(),
      original: env::var_os(name),
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(value) => unsafe {
        env::set_var(&self.name, value);
      },
      None => unsafe {
        env::remove_var(&self.name);
      },
    }
  }
}
