use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, instrument};

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::{
  CreateRepositoryParameters, DeleteRepositoryParameters, GetRepositoryParameters, GitHubRepository,
};
use crate::request::GitHubRequest;
use crate::response::GitHubResponse;
use crate::responses::{CreateRepositoryResponse, GetRepositoriesForAuthenticatedUserResponse, GetRepositoryResponse};

/// Repository operations
#[async_trait]
pub trait RepositoryEndpoints: GitHubClient {
  /// `GET /repos/{owner}/{repo}`
  #[instrument(skip(self), level = "debug")]
  async fn send_get_repository_request(&self, parameters: &GetRepositoryParameters) -> Result<GetRepositoryResponse> {
    let mut request = GitHubRequest::new();
    request.set_method(Method::GET).set_path(&parameters.path()?)?;
    let response = self.send(&request).await?;
    Ok(GetRepositoryResponse::new(response))
  }

  #[instrument(skip(self), level = "debug")]
  async fn get_repository(&self, parameters: &GetRepositoryParameters) -> Result<GitHubRepository> {
    let mut response = self.send_get_repository_request(parameters).await?;
    let repository = response.repository().await;
    response.dispose();
    repository
  }

  /// `GET /user/repos`
  #[instrument(skip(self), level = "debug")]
  async fn send_get_repositories_for_authenticated_user_request(
    &self,
  ) -> Result<GetRepositoriesForAuthenticatedUserResponse> {
    let mut request = GitHubRequest::new();
    request.set_method(Method::GET).set_path("/user/repos")?;
    let response = self.send(&request).await?;
    Ok(GetRepositoriesForAuthenticatedUserResponse::new(response))
  }

  /// Repositories the authenticated user can access
  #[instrument(skip(self), level = "debug")]
  async fn get_repositories_for_authenticated_user(&self) -> Result<Vec<GitHubRepository>> {
    let mut response = self.send_get_repositories_for_authenticated_user_request().await?;
    let repositories = response.repositories().await;
    response.dispose();
    repositories
  }

  /// `POST /user/repos`
  #[instrument(skip(self), level = "debug")]
  async fn send_create_repository_request(
    &self,
    parameters: &CreateRepositoryParameters,
  ) -> Result<CreateRepositoryResponse> {
    let body = parameters.to_body()?;
    let mut request = GitHubRequest::new();
    request
      .set_method(Method::POST)
      .set_path("/user/repos")?
      .set_body_json(&body)?;
    let response = self.send(&request).await?;
    Ok(CreateRepositoryResponse::new(response))
  }

  /// Create a repository for the authenticated user
  #[instrument(skip(self), level = "debug")]
  async fn create_repository(&self, parameters: &CreateRepositoryParameters) -> Result<GitHubRepository> {
    let mut response = self.send_create_repository_request(parameters).await?;
    let repository = response.repository().await;
    response.dispose();
    repository
  }

  /// `DELETE /repos/{owner}/{repo}`
  #[instrument(skip(self), level = "debug")]
  async fn send_delete_repository_request(&self, parameters: &DeleteRepositoryParameters) -> Result<GitHubResponse> {
    let mut request = GitHubRequest::new();
    request.set_method(Method::DELETE).set_path(&parameters.path()?)?;
    self.send(&request).await
  }

  #[instrument(skip(self), level = "debug")]
  async fn delete_repository(&self, parameters: &DeleteRepositoryParameters) -> Result<()> {
    let mut response = self.send_delete_repository_request(parameters).await?;
    let result = response.error_for_status().await;
    response.dispose();
    if result.is_ok() {
      debug!("Deleted repository {:?}/{:?}", parameters.owner(), parameters.name());
    }
    result
  }

  /// `DELETE /repos/{owner}/{repo}` for an existing repository, identified by
  /// its `owner.login` and `name`
  #[instrument(skip(self, repository), fields(full_name = ?repository.full_name()), level = "debug")]
  async fn send_delete_repository_request_by_value(&self, repository: &GitHubRepository) -> Result<GitHubResponse> {
    let parameters = DeleteRepositoryParameters::from_repository(repository)?;
    self.send_delete_repository_request(&parameters).await
  }

  #[instrument(skip(self, repository), fields(full_name = ?repository.full_name()), level = "debug")]
  async fn delete_repository_by_value(&self, repository: &GitHubRepository) -> Result<()> {
    let mut response = self.send_delete_repository_request_by_value(repository).await?;
    let result = response.error_for_status().await;
    response.dispose();
    result
  }
}

impl<C: GitHubClient + ?Sized> RepositoryEndpoints for C {}
