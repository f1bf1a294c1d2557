//! # Error Model
//!
//! Failure taxonomy for the request/response pipeline. Precondition
//! violations are reported before any I/O happens, parse failures surface when
//! a body cannot be read as the expected JSON shape, and 4xx responses are
//! converted into an [`ApiError`] carrying GitHub's structured error body.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error_response::{ErrorDetail, ErrorResponse};

/// Boxed error used for failures raised by an [`HttpTransport`](crate::transport::HttpTransport)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by the GitHub client pipeline
#[derive(Debug, Error)]
pub enum Error {
  /// Malformed caller input (empty method, path, token, owner or name).
  #[error("precondition failed: {0}")]
  Precondition(String),
  /// The response body was absent, empty, or not the expected JSON shape.
  #[error("failed to parse response body: {0}")]
  Parse(String),
  /// GitHub answered with a status in the 4xx range.
  #[error(transparent)]
  Api(#[from] ApiError),
  /// Failure reported by the underlying transport, passed through untouched.
  #[error("transport error: {0}")]
  Transport(#[source] BoxError),
  /// A base URL could not be parsed.
  #[error("invalid URL: {0}")]
  Url(#[from] url::ParseError),
}

impl Error {
  /// Wrap an arbitrary transport failure
  pub fn transport(error: impl Into<BoxError>) -> Self {
    Self::Transport(error.into())
  }

  /// Returns the API error if this is one
  pub fn as_api_error(&self) -> Option<&ApiError> {
    match self {
      Self::Api(api_error) => Some(api_error),
      _ => None,
    }
  }

  /// Whether this error is a precondition violation
  pub fn is_precondition(&self) -> bool {
    matches!(self, Self::Precondition(_))
  }
}

/// Result type used throughout the client
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::Precondition`] when `value` is empty.
pub(crate) fn ensure_not_empty(value: &str, name: &str) -> Result<()> {
  if value.is_empty() {
    return Err(Error::Precondition(format!("{name} cannot be empty.")));
  }
  Ok(())
}

/// Unwrap an optional argument, failing with [`Error::Precondition`] when it is
/// absent or empty.
pub(crate) fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
  let value = value.ok_or_else(|| Error::Precondition(format!("{name} cannot be null.")))?;
  ensure_not_empty(value, name)?;
  Ok(value)
}

/// An error response returned by GitHub for a request
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .error_response.message().unwrap_or_default())]
pub struct ApiError {
  status_code: u16,
  error_response: ErrorResponse,
}

impl ApiError {
  /// Create a new API error.
  ///
  /// Every real GitHub error payload carries a message, so an error response
  /// without one is rejected with [`Error::Precondition`].
  pub fn new(status_code: u16, error_response: ErrorResponse) -> Result<Self> {
    require(error_response.message(), "errorResponse.message")?;

    Ok(Self {
      status_code,
      error_response,
    })
  }

  /// The status code of the response that produced this error
  pub fn status_code(&self) -> u16 {
    self.status_code
  }

  /// The parsed error body
  pub fn error_response(&self) -> &ErrorResponse {
    &self.error_response
  }

  /// The message GitHub gave for the failure
  pub fn message(&self) -> &str {
    self.error_response.message().unwrap_or_default()
  }

  /// The documentation URL GitHub provided as an explanation for the failure
  pub fn documentation_url(&self) -> Option<&str> {
    self.error_response.documentation_url()
  }

  /// The individual errors that were reported for the failed request
  pub fn errors(&self) -> &[ErrorDetail] {
    self.error_response.errors()
  }

  /// JSON representation: `{"statusCode": N, "errorResponse": {...}}`
  pub fn to_json(&self) -> Value {
    let mut json = Map::new();
    json.insert("statusCode".to_string(), Value::from(self.status_code));
    json.insert("errorResponse".to_string(), self.error_response.to_json());
    Value::Object(json)
  }
}
