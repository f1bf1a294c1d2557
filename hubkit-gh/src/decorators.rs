//! Client decorators.
//!
//! A decorator owns an inner [`GitHubClient`] and implements the same trait.
//! On `send` it clones the caller's request, transforms the clone and passes
//! it to the inner client. Decorators stack; the outermost transform runs
//! first.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{instrument, trace};
use url::Url;

use crate::client::GitHubClient;
use crate::error::{Error, Result, ensure_not_empty};
use crate::request::{GitHubRequest, authorization_value};
use crate::response::GitHubResponse;

/// Decorator that sets `Authorization: token {token}` on every request,
/// replacing any value the caller set
pub struct AuthenticatedGitHubClient<C> {
  inner: C,
  access_token: String,
}

impl<C: GitHubClient> AuthenticatedGitHubClient<C> {
  pub fn new(inner: C, access_token: &str) -> Result<Self> {
    authorization_value(access_token)?;
    Ok(Self {
      inner,
      access_token: access_token.to_string(),
    })
  }

  pub fn inner(&self) -> &C {
    &self.inner
  }

  pub fn into_inner(self) -> C {
    self.inner
  }
}

impl<C: fmt::Debug> fmt::Debug for AuthenticatedGitHubClient<C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AuthenticatedGitHubClient")
      .field("inner", &self.inner)
      .field("access_token", &"<redacted>")
      .finish()
  }
}

#[async_trait]
impl<C: GitHubClient> GitHubClient for AuthenticatedGitHubClient<C> {
  fn base_url(&self) -> &Url {
    self.inner.base_url()
  }

  fn set_base_url(&mut self, base_url: Url) {
    self.inner.set_base_url(base_url);
  }

  fn set_access_token(&mut self, access_token: &str) -> Result<()> {
    authorization_value(access_token)?;
    self.access_token = access_token.to_string();
    Ok(())
  }

  fn has_access_token(&self) -> bool {
    true
  }

  #[instrument(skip(self, request), level = "debug")]
  async fn send(&self, request: &GitHubRequest) -> Result<GitHubResponse> {
    let mut request = request.clone();
    request.set_authorization_header(&self.access_token)?;
    trace!("Attached access token to request");
    self.inner.send(&request).await
  }
}

/// Decorator that applies a fixed set of headers to every request.
///
/// Token management is forwarded to the inner client.
#[derive(Debug)]
pub struct HeadersGitHubClient<C> {
  inner: C,
  headers: HeaderMap,
}

impl<C: GitHubClient> HeadersGitHubClient<C> {
  pub fn new(inner: C) -> Self {
    Self {
      inner,
      headers: HeaderMap::new(),
    }
  }

  /// Add a header applied to every request
  pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
    ensure_not_empty(name, "headerName")?;
    let header_name = HeaderName::from_bytes(name.as_bytes())
      .map_err(|e| Error::Precondition(format!("header name {name:?} is invalid: {e}")))?;
    let header_value = HeaderValue::from_str(value)
      .map_err(|e| Error::Precondition(format!("value for header {name:?} is invalid: {e}")))?;
    self.headers.insert(header_name, header_value);
    Ok(self)
  }

  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  pub fn inner(&self) -> &C {
    &self.inner
  }

  pub fn into_inner(self) -> C {
    self.inner
  }
}

#[async_trait]
impl<C: GitHubClient> GitHubClient for HeadersGitHubClient<C> {
  fn base_url(&self) -> &Url {
    self.inner.base_url()
  }

  fn set_base_url(&mut self, base_url: Url) {
    self.inner.set_base_url(base_url);
  }

  fn set_access_token(&mut self, access_token: &str) -> Result<()> {
    self.inner.set_access_token(access_token)
  }

  fn has_access_token(&self) -> bool {
    self.inner.has_access_token()
  }

  #[instrument(skip(self, request), level = "debug")]
  async fn send(&self, request: &GitHubRequest) -> Result<GitHubResponse> {
    let mut request = request.clone();
    request.set_headers(&self.headers);
    trace!("Applied {} fixed headers to request", self.headers.len());
    self.inner.send(&request).await
  }
}
