//! Access token discovery from `.netrc`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Hosts checked for a GitHub token, in order
pub const NETRC_MACHINES: [&str; 2] = ["api.github.com", "github.com"];

/// Returns the path to the `.netrc` file in `home`
pub fn netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Read the password (token) stored for `machine`.
///
/// Both the single-line (`machine host login user password pass`) and the
/// multi-line layouts are accepted. Returns `Ok(None)` when there is no entry
/// for the machine or it has no password.
pub fn parse_netrc_password(path: &Path, machine: &str) -> Result<Option<String>> {
  let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
  let reader = BufReader::new(file);

  let mut tokens = Vec::new();
  for line in reader.lines() {
    let line = line.context("Failed to read line from .netrc")?;
    tokens.extend(line.split_whitespace().map(str::to_string));
  }

  let mut current_machine: Option<&str> = None;
  let mut tokens = tokens.iter();
  while let Some(token) = tokens.next() {
    match token.as_str() {
      "machine" => current_machine = tokens.next().map(String::as_str),
      "default" => current_machine = None,
      "password" => {
        let password = tokens.next();
        if current_machine == Some(machine)
          && let Some(password) = password
        {
          return Ok(Some(password.clone()));
        }
      }
      _ => {}
    }
  }

  Ok(None)
}

/// Look up a GitHub token in `home/.netrc`.
///
/// A missing file is not an error.
pub fn token_from_netrc(home: &Path) -> Result<Option<String>> {
  let path = netrc_path(home);
  if !path.exists() {
    return Ok(None);
  }

  for machine in NETRC_MACHINES {
    if let Some(token) = parse_netrc_password(&path, machine)? {
      debug!("Found GitHub token in .netrc for {machine}");
      return Ok(Some(token));
    }
  }
  Ok(None)
}
