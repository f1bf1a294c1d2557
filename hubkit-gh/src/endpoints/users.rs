use async_trait::async_trait;
use reqwest::Method;
use tracing::instrument;

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::GitHubUser;
use crate::request::GitHubRequest;
use crate::responses::GetAuthenticatedUserResponse;

/// User operations
#[async_trait]
pub trait UserEndpoints: GitHubClient {
  /// `GET /user`
  #[instrument(skip(self), level = "debug")]
  async fn send_get_authenticated_user_request(&self) -> Result<GetAuthenticatedUserResponse> {
    let mut request = GitHubRequest::new();
    request.set_method(Method::GET).set_path("/user")?;
    let response = self.send(&request).await?;
    Ok(GetAuthenticatedUserResponse::new(response))
  }

  /// Get the user the access token belongs to
  #[instrument(skip(self), level = "debug")]
  async fn get_authenticated_user(&self) -> Result<GitHubUser> {
    let mut response = self.send_get_authenticated_user_request().await?;
    let user = response.authenticated_user().await;
    response.dispose();
    user
  }
}

impl<C: GitHubClient + ?Sized> UserEndpoints for C {}
