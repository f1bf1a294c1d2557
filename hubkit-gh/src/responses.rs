//! Endpoint-specific response wrappers.
//!
//! Each wrapper keeps the raw [`GitHubResponse`] available for inspection and
//! adds one extractor that raises [`Error::Api`](crate::Error::Api) on a
//! client error status before reading the typed payload.

use serde_json::Value;

use crate::error::Result;
use crate::models::{GitHubRepository, GitHubUser};
use crate::response::GitHubResponse;

macro_rules! typed_response {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug)]
    pub struct $name {
      response: GitHubResponse,
    }

    impl $name {
      pub fn new(response: GitHubResponse) -> Self {
        Self { response }
      }

      pub fn as_response(&self) -> &GitHubResponse {
        &self.response
      }

      pub fn as_response_mut(&mut self) -> &mut GitHubResponse {
        &mut self.response
      }

      pub fn into_response(self) -> GitHubResponse {
        self.response
      }

      pub fn dispose(&mut self) -> bool {
        self.response.dispose()
      }
    }

    impl From<GitHubResponse> for $name {
      fn from(response: GitHubResponse) -> Self {
        Self::new(response)
      }
    }
  };
}

typed_response!(
  /// Response to `GET /user`
  GetAuthenticatedUserResponse
);

typed_response!(
  /// Response to `GET /repos/{owner}/{repo}`
  GetRepositoryResponse
);

typed_response!(
  /// Response to `GET /user/repos`
  GetRepositoriesForAuthenticatedUserResponse
);

typed_response!(
  /// Response to `POST /user/repos`
  CreateRepositoryResponse
);

async fn single_repository(response: &mut GitHubResponse) -> Result<GitHubRepository> {
  response.error_for_status().await?;
  let json = response.body_json_object().await?;
  Ok(GitHubRepository::from_json(json.clone()))
}

impl GetAuthenticatedUserResponse {
  /// The authenticated user
  pub async fn authenticated_user(&mut self) -> Result<GitHubUser> {
    self.response.error_for_status().await?;
    let json = self.response.body_json_object().await?;
    Ok(GitHubUser::from_json(json.clone()))
  }
}

impl GetRepositoryResponse {
  pub async fn repository(&mut self) -> Result<GitHubRepository> {
    single_repository(&mut self.response).await
  }
}

impl CreateRepositoryResponse {
  /// The repository that was created
  pub async fn repository(&mut self) -> Result<GitHubRepository> {
    single_repository(&mut self.response).await
  }
}

impl GetRepositoriesForAuthenticatedUserResponse {
  /// The listed repositories. Array elements that are not objects are
  /// skipped.
  pub async fn repositories(&mut self) -> Result<Vec<GitHubRepository>> {
    self.response.error_for_status().await?;
    let json = self.response.body_json_array().await?;
    Ok(
      json
        .iter()
        .filter_map(Value::as_object)
        .map(|repository| GitHubRepository::from_json(repository.clone()))
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use crate::transport::HttpResponse;

  fn response(status_code: u16, body: &'static str) -> GitHubResponse {
    GitHubResponse::new(HttpResponse::new(status_code).with_body(body))
  }

  #[tokio::test]
  async fn test_repositories_skips_non_objects() -> Result<()> {
    let mut typed = GetRepositoriesForAuthenticatedUserResponse::new(response(
      200,
      r#"[{"name":"a"}, 5, "b", {"name":"c"}, null]"#,
    ));

    let names: Vec<_> = typed
      .repositories()
      .await?
      .iter()
      .map(|repository| repository.name().map(str::to_string))
      .collect();
    assert_eq!(names, vec![Some("a".to_string()), Some("c".to_string())]);
    Ok(())
  }

  #[tokio::test]
  async fn test_extractors_raise_api_errors() {
    let mut typed = GetRepositoryResponse::new(response(404, r#"{"message":"Not Found"}"#));
    let error = typed.repository().await.unwrap_err();
    assert_eq!(error.as_api_error().unwrap().status_code(), 404);

    // The raw response is still readable
    assert_eq!(typed.as_response().status_code(), 404);
    assert_eq!(
      typed.as_response_mut().body_json().await.unwrap()["message"],
      "Not Found"
    );
  }

  #[tokio::test]
  async fn test_extractor_shape_mismatch_is_parse_error() {
    let mut typed = GetAuthenticatedUserResponse::new(response(200, "[]"));
    assert!(matches!(typed.authenticated_user().await, Err(Error::Parse(_))));

    let mut typed = GetRepositoriesForAuthenticatedUserResponse::new(response(200, "{}"));
    assert!(matches!(typed.repositories().await, Err(Error::Parse(_))));
  }

  #[tokio::test]
  async fn test_server_errors_are_not_classified() {
    let mut typed = CreateRepositoryResponse::new(response(503, "Service Unavailable"));
    assert!(!typed.as_response().is_error_response());
    assert!(matches!(typed.repository().await, Err(Error::Parse(_))));
  }

  #[tokio::test]
  async fn test_dispose_is_idempotent() {
    let mut typed = GetAuthenticatedUserResponse::new(response(200, r#"{"login":"octocat"}"#));
    assert!(typed.dispose());
    assert!(!typed.dispose());
    assert!(typed.into_response().is_disposed());
  }
}
