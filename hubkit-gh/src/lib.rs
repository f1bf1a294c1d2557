//! # GitHub API Client
//!
//! Typed client for the GitHub REST API. Requests are built with
//! [`GitHubRequest`], sent through any [`GitHubClient`] (a
//! [`BasicGitHubClient`] leaf, optionally wrapped in decorators such as
//! [`AuthenticatedGitHubClient`]), and come back as [`GitHubResponse`]s whose
//! JSON body is parsed once and cached. Typed operations live on the
//! [`UserEndpoints`] and [`RepositoryEndpoints`] extension traits.

pub mod auth;
pub mod body;
pub mod client;
pub mod config;
pub mod consts;
pub mod decorators;
pub mod endpoints;
pub mod error;
pub mod error_response;
mod json;
pub mod models;
pub mod request;
pub mod response;
pub mod responses;
pub mod transport;

#[cfg(test)]
mod testing;

pub use body::{ByteStream, RequestBody};
pub use client::{BasicGitHubClient, GitHubClient};
pub use config::ClientConfig;
pub use decorators::{AuthenticatedGitHubClient, HeadersGitHubClient};
pub use endpoints::{RepositoryEndpoints, UserEndpoints};
pub use error::{ApiError, Error, Result};
pub use error_response::{ErrorDetail, ErrorResponse};
pub use models::{
  CreateRepositoryParameters, DeleteRepositoryParameters, GetRepositoryParameters, GitHubRepository, GitHubUser,
  RepositoryParameters,
};
pub use request::GitHubRequest;
pub use response::{GitHubResponse, is_error_status};
pub use responses::{
  CreateRepositoryResponse, GetAuthenticatedUserResponse, GetRepositoriesForAuthenticatedUserResponse,
  GetRepositoryResponse,
};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
