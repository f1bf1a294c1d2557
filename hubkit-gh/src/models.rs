//! # GitHub Data Models
//!
//! View objects over JSON documents returned by, or sent to, the GitHub API.
//! Each keeps the full document so properties without a typed accessor
//! survive a round trip.

use serde_json::{Map, Value};

use crate::error::{Error, Result, ensure_not_empty, require};
use crate::json;

const LOGIN: &str = "login";
const NAME: &str = "name";
const FULL_NAME: &str = "full_name";
const OWNER: &str = "owner";
const GIT_URL: &str = "git_url";
const CLONE_URL: &str = "clone_url";
const DESCRIPTION: &str = "description";
const PRIVATE: &str = "private";

/// A GitHub user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitHubUser {
  json: Map<String, Value>,
}

impl GitHubUser {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_json(json: Map<String, Value>) -> Self {
    Self { json }
  }

  pub fn as_json(&self) -> &Map<String, Value> {
    &self.json
  }

  pub fn into_json(self) -> Map<String, Value> {
    self.json
  }

  /// The user's login name
  pub fn login(&self) -> Option<&str> {
    json::get_str(&self.json, LOGIN)
  }

  pub fn set_login(&mut self, login: &str) -> Result<&mut Self> {
    ensure_not_empty(login, "login")?;
    json::set_str(&mut self.json, LOGIN, login);
    Ok(self)
  }
}

/// A GitHub repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitHubRepository {
  json: Map<String, Value>,
}

impl GitHubRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_json(json: Map<String, Value>) -> Self {
    Self { json }
  }

  pub fn as_json(&self) -> &Map<String, Value> {
    &self.json
  }

  pub fn into_json(self) -> Map<String, Value> {
    self.json
  }

  pub fn name(&self) -> Option<&str> {
    json::get_str(&self.json, NAME)
  }

  pub fn set_name(&mut self, name: &str) -> Result<&mut Self> {
    ensure_not_empty(name, "name")?;
    json::set_str(&mut self.json, NAME, name);
    Ok(self)
  }

  /// Owner and repository name, e.g. `octokit/octokit.net`
  pub fn full_name(&self) -> Option<&str> {
    json::get_str(&self.json, FULL_NAME)
  }

  pub fn set_full_name(&mut self, full_name: &str) -> Result<&mut Self> {
    ensure_not_empty(full_name, "fullName")?;
    json::set_str(&mut self.json, FULL_NAME, full_name);
    Ok(self)
  }

  pub fn owner(&self) -> Option<GitHubUser> {
    json::get_object(&self.json, OWNER).map(|owner| GitHubUser::from_json(owner.clone()))
  }

  pub fn set_owner(&mut self, owner: GitHubUser) -> &mut Self {
    self.json.insert(OWNER.to_string(), Value::Object(owner.into_json()));
    self
  }

  pub fn git_url(&self) -> Option<&str> {
    json::get_str(&self.json, GIT_URL)
  }

  pub fn clone_url(&self) -> Option<&str> {
    json::get_str(&self.json, CLONE_URL)
  }
}

/// Identifies a single repository by owner and name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryParameters {
  owner: Option<String>,
  name: Option<String>,
}

/// Parameters for `GET /repos/{owner}/{repo}`
pub type GetRepositoryParameters = RepositoryParameters;

/// Parameters for `DELETE /repos/{owner}/{repo}`
pub type DeleteRepositoryParameters = RepositoryParameters;

impl RepositoryParameters {
  pub fn new(owner: &str, name: &str) -> Result<Self> {
    let mut parameters = Self::default();
    parameters.set_owner(owner)?.set_name(name)?;
    Ok(parameters)
  }

  /// Parameters naming an existing repository, taken from its `owner.login`
  /// and `name`
  pub fn from_repository(repository: &GitHubRepository) -> Result<Self> {
    let owner = repository.owner();
    let owner = require(owner.as_ref().and_then(GitHubUser::login), "repository.owner.login")?;
    let name = require(repository.name(), "repository.name")?;
    Self::new(owner, name)
  }

  pub fn owner(&self) -> Option<&str> {
    self.owner.as_deref()
  }

  pub fn set_owner(&mut self, owner: &str) -> Result<&mut Self> {
    ensure_path_segment(owner, "owner")?;
    self.owner = Some(owner.to_string());
    Ok(self)
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn set_name(&mut self, name: &str) -> Result<&mut Self> {
    ensure_path_segment(name, "name")?;
    self.name = Some(name.to_string());
    Ok(self)
  }

  pub(crate) fn path(&self) -> Result<String> {
    let owner = require(self.owner(), "parameters.owner")?;
    let name = require(self.name(), "parameters.name")?;
    Ok(format!("/repos/{owner}/{name}"))
  }
}

/// `value` must be usable verbatim as one URL path segment
fn ensure_path_segment(value: &str, name: &str) -> Result<()> {
  ensure_not_empty(value, name)?;
  if value == "." || value == ".." || value.contains(['/', '?', '#']) {
    return Err(Error::Precondition(format!(
      "{name} {value:?} is not a valid path segment."
    )));
  }
  Ok(())
}

/// Body of `POST /user/repos`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateRepositoryParameters {
  json: Map<String, Value>,
}

impl CreateRepositoryParameters {
  pub fn new(name: &str) -> Result<Self> {
    let mut parameters = Self::default();
    parameters.set_name(name)?;
    Ok(parameters)
  }

  pub fn name(&self) -> Option<&str> {
    json::get_str(&self.json, NAME)
  }

  pub fn set_name(&mut self, name: &str) -> Result<&mut Self> {
    ensure_not_empty(name, "name")?;
    json::set_str(&mut self.json, NAME, name);
    Ok(self)
  }

  pub fn description(&self) -> Option<&str> {
    json::get_str(&self.json, DESCRIPTION)
  }

  pub fn set_description(&mut self, description: &str) -> Result<&mut Self> {
    ensure_not_empty(description, "description")?;
    json::set_str(&mut self.json, DESCRIPTION, description);
    Ok(self)
  }

  /// Whether the created repository will be private
  pub fn private(&self) -> Option<bool> {
    json::get_bool(&self.json, PRIVATE)
  }

  pub fn set_private(&mut self, private: bool) -> &mut Self {
    self.json.insert(PRIVATE.to_string(), Value::Bool(private));
    self
  }

  pub fn as_json(&self) -> &Map<String, Value> {
    &self.json
  }

  /// The request body, after checking that a name is present
  pub(crate) fn to_body(&self) -> Result<Value> {
    require(self.name(), "parameters.name")?;
    Ok(Value::Object(self.json.clone()))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
  }

  #[test]
  fn test_repository_accessors() {
    let repository = GitHubRepository::from_json(object(json!({
      "id": 7528679,
      "name": "octokit.net",
      "full_name": "octokit/octokit.net",
      "owner": { "login": "octokit", "id": 3430433 },
      "git_url": "git://github.com/octokit/octokit.net.git",
      "clone_url": "https://github.com/octokit/octokit.net.git"
    })));

    assert_eq!(repository.name(), Some("octokit.net"));
    assert_eq!(repository.full_name(), Some("octokit/octokit.net"));
    assert_eq!(repository.owner().unwrap().login(), Some("octokit"));
    assert_eq!(repository.git_url(), Some("git://github.com/octokit/octokit.net.git"));
    assert_eq!(repository.clone_url(), Some("https://github.com/octokit/octokit.net.git"));
    // Unmodelled properties are kept
    assert_eq!(repository.as_json()["id"], json!(7528679));
  }

  #[test]
  fn test_repository_missing_or_wrong_typed_properties() {
    let repository = GitHubRepository::from_json(object(json!({ "name": 5, "owner": "octokit" })));
    assert_eq!(repository.name(), None);
    assert_eq!(repository.owner(), None);
    assert_eq!(repository.full_name(), None);
  }

  #[test]
  fn test_repository_setters() -> anyhow::Result<()> {
    let mut owner = GitHubUser::new();
    owner.set_login("octocat")?;

    let mut repository = GitHubRepository::new();
    repository.set_name("hello")?.set_full_name("octocat/hello")?.set_owner(owner);

    assert_eq!(
      Value::Object(repository.clone().into_json()),
      json!({ "name": "hello", "full_name": "octocat/hello", "owner": { "login": "octocat" } })
    );
    assert!(repository.set_name("").unwrap_err().is_precondition());
    assert!(repository.set_full_name("").unwrap_err().is_precondition());
    assert_eq!(repository.name(), Some("hello"));
    Ok(())
  }

  #[test]
  fn test_user_login() {
    let mut user = GitHubUser::from_json(object(json!({ "login": "octocat" })));
    assert_eq!(user.login(), Some("octocat"));
    assert!(user.set_login("").unwrap_err().is_precondition());
  }

  #[test]
  fn test_repository_parameters_path() -> anyhow::Result<()> {
    let parameters = GetRepositoryParameters::new("octokit", "octokit.net")?;
    assert_eq!(parameters.path()?, "/repos/octokit/octokit.net");

    assert!(RepositoryParameters::new("", "octokit.net").unwrap_err().is_precondition());
    assert!(RepositoryParameters::new("octokit", "").unwrap_err().is_precondition());

    let error = RepositoryParameters::default().path().unwrap_err();
    assert_eq!(error.to_string(), "precondition failed: parameters.owner cannot be null.");

    let mut parameters = RepositoryParameters::default();
    parameters.set_owner("octokit")?;
    let error = parameters.path().unwrap_err();
    assert_eq!(error.to_string(), "precondition failed: parameters.name cannot be null.");
    Ok(())
  }

  #[test]
  fn test_repository_parameters_reject_path_significant_values() {
    for owner in ["..", ".", "octocat/other", "octo?cat", "octo#cat"] {
      let error = RepositoryParameters::new(owner, "repo").unwrap_err();
      assert!(error.is_precondition(), "owner {owner:?} should be rejected");
    }
    for name in ["..", ".", "hello?x=1", "hello#top", "hello/world"] {
      let error = RepositoryParameters::new("octocat", name).unwrap_err();
      assert!(error.is_precondition(), "name {name:?} should be rejected");
    }

    let mut parameters = RepositoryParameters::default();
    assert!(parameters.set_owner("..").is_err());
    assert_eq!(parameters.owner(), None);

    // Dots inside a name are fine
    assert!(RepositoryParameters::new("octokit", "octokit.net").is_ok());
    assert!(RepositoryParameters::new("octocat", "...dots").is_ok());
  }

  #[test]
  fn test_delete_parameters_from_repository() -> anyhow::Result<()> {
    let repository = GitHubRepository::from_json(object(json!({
      "name": "fake-repo",
      "owner": { "login": "fake-user" }
    })));
    let parameters = DeleteRepositoryParameters::from_repository(&repository)?;
    assert_eq!(parameters.owner(), Some("fake-user"));
    assert_eq!(parameters.name(), Some("fake-repo"));

    let orphan = GitHubRepository::from_json(object(json!({ "name": "fake-repo" })));
    let error = DeleteRepositoryParameters::from_repository(&orphan).unwrap_err();
    assert!(error.to_string().contains("repository.owner.login cannot be null."));
    Ok(())
  }

  #[test]
  fn test_create_repository_parameters() -> anyhow::Result<()> {
    let mut parameters = CreateRepositoryParameters::new("github-java")?;
    assert_eq!(parameters.private(), None);
    assert_eq!(parameters.to_body()?, json!({ "name": "github-java" }));

    parameters.set_description("A GitHub client")?.set_private(true);
    assert_eq!(parameters.description(), Some("A GitHub client"));
    assert_eq!(parameters.private(), Some(true));
    assert_eq!(
      parameters.to_body()?,
      json!({ "name": "github-java", "description": "A GitHub client", "private": true })
    );

    assert!(parameters.set_description("").unwrap_err().is_precondition());
    assert!(CreateRepositoryParameters::default().to_body().unwrap_err().is_precondition());
    Ok(())
  }
}
