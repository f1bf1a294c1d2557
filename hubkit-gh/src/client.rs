//! # GitHub Client
//!
//! The [`GitHubClient`] trait is the capability every client exposes: a base
//! URL, token management and `send`. [`BasicGitHubClient`] is the leaf that
//! dispatches through an [`HttpTransport`]. Decorators in
//! [`crate::decorators`] wrap any client and transform requests on the way
//! through.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{Error, Result, ensure_not_empty};
use crate::request::{GitHubRequest, authorization_value};
use crate::response::GitHubResponse;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

/// A client that can send requests to GitHub
#[async_trait]
pub trait GitHubClient: Send + Sync {
  /// Base URL used for requests without their own override
  fn base_url(&self) -> &Url;

  fn set_base_url(&mut self, base_url: Url);

  fn set_base_url_str(&mut self, base_url: &str) -> Result<()> {
    ensure_not_empty(base_url, "baseUrl")?;
    let base_url = Url::parse(base_url)?;
    self.set_base_url(base_url);
    Ok(())
  }

  /// Set the access token attached to every request
  fn set_access_token(&mut self, access_token: &str) -> Result<()>;

  fn has_access_token(&self) -> bool;

  /// Send a request. The caller's request is never modified, and error
  /// statuses are returned as ordinary responses.
  async fn send(&self, request: &GitHubRequest) -> Result<GitHubResponse>;
}

#[async_trait]
impl<C> GitHubClient for Box<C>
where
  C: GitHubClient + ?Sized,
{
  fn base_url(&self) -> &Url {
    (**self).base_url()
  }

  fn set_base_url(&mut self, base_url: Url) {
    (**self).set_base_url(base_url);
  }

  fn set_access_token(&mut self, access_token: &str) -> Result<()> {
    (**self).set_access_token(access_token)
  }

  fn has_access_token(&self) -> bool {
    (**self).has_access_token()
  }

  async fn send(&self, request: &GitHubRequest) -> Result<GitHubResponse> {
    (**self).send(request).await
  }
}

/// Leaf client holding a transport, a base URL and an optional token.
///
/// Without a token, requests go out anonymously.
pub struct BasicGitHubClient<T: HttpTransport = ReqwestTransport> {
  transport: T,
  base_url: Url,
  access_token: Option<String>,
}

impl BasicGitHubClient<ReqwestTransport> {
  /// Anonymous client for `https://api.github.com` over reqwest
  pub fn new() -> Result<Self> {
    Ok(Self::with_transport(ReqwestTransport::new()?))
  }

  /// Build a client from loaded configuration
  pub fn from_config(config: &ClientConfig) -> Result<Self> {
    let mut client = Self::with_transport(ReqwestTransport::with_user_agent(&config.user_agent)?);
    client.set_base_url(config.base_url.clone());
    if let Some(access_token) = &config.access_token {
      client.set_access_token(access_token)?;
    }
    Ok(client)
  }
}

impl<T: HttpTransport> BasicGitHubClient<T> {
  pub fn with_transport(transport: T) -> Self {
    Self {
      transport,
      base_url: DEFAULT_BASE_URL.clone(),
      access_token: None,
    }
  }

  pub fn transport(&self) -> &T {
    &self.transport
  }

  /// Stop sending an access token
  pub fn clear_access_token(&mut self) {
    self.access_token = None;
  }
}

impl<T: HttpTransport> fmt::Debug for BasicGitHubClient<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BasicGitHubClient")
      .field("base_url", &self.base_url.as_str())
      .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
      .finish_non_exhaustive()
  }
}

#[async_trait]
impl<T: HttpTransport> GitHubClient for BasicGitHubClient<T> {
  fn base_url(&self) -> &Url {
    &self.base_url
  }

  fn set_base_url(&mut self, base_url: Url) {
    self.base_url = base_url;
  }

  fn set_access_token(&mut self, access_token: &str) -> Result<()> {
    authorization_value(access_token)?;
    self.access_token = Some(access_token.to_string());
    Ok(())
  }

  fn has_access_token(&self) -> bool {
    self.access_token.is_some()
  }

  #[instrument(skip(self, request), level = "debug")]
  async fn send(&self, request: &GitHubRequest) -> Result<GitHubResponse> {
    let method = request
      .method()
      .cloned()
      .ok_or_else(|| Error::Precondition("request.method cannot be null.".to_string()))?;
    let url = request.resolve_url(&self.base_url)?;

    let mut headers = request.headers().clone();
    if let Some(access_token) = &self.access_token {
      headers.insert(AUTHORIZATION, authorization_value(access_token)?);
    }

    debug!(
      "Dispatching {} {} (authenticated: {})",
      method,
      url,
      self.access_token.is_some()
    );
    let response = self
      .transport
      .send(HttpRequest {
        method,
        url,
        headers,
        body: request.body().cloned(),
      })
      .await?;

    Ok(GitHubResponse::new(response))
  }
}
