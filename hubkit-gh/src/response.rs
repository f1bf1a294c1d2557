//! # GitHub Responses
//!
//! Wraps an [`HttpResponse`](crate::transport::HttpResponse) and parses its
//! body as JSON on first access. The parsed value is cached, so the body
//! stream is read at most once.

use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{ApiError, Error, Result};
use crate::error_response::ErrorResponse;
use crate::json;
use crate::transport::HttpResponse;

/// Whether `status_code` is classified as a client error: `400..=499`.
pub fn is_error_status(status_code: u16) -> bool {
  (400..=499).contains(&status_code)
}

/// A response received from GitHub
#[derive(Debug)]
pub struct GitHubResponse {
  inner: HttpResponse,
  body_json: Option<Value>,
}

impl GitHubResponse {
  pub fn new(inner: HttpResponse) -> Self {
    Self { inner, body_json: None }
  }

  pub fn http_version(&self) -> &str {
    self.inner.http_version()
  }

  pub fn status_code(&self) -> u16 {
    self.inner.status_code()
  }

  pub fn reason_phrase(&self) -> &str {
    self.inner.reason_phrase()
  }

  pub fn headers(&self) -> &HeaderMap {
    self.inner.headers()
  }

  /// Value of a header, looked up case-insensitively
  pub fn header(&self, name: &str) -> Option<&str> {
    self.inner.headers().get(name).and_then(|value| value.to_str().ok())
  }

  pub fn is_disposed(&self) -> bool {
    self.inner.is_disposed()
  }

  /// Release the underlying body. Returns `true` the first time only.
  pub fn dispose(&mut self) -> bool {
    self.inner.dispose()
  }

  pub fn into_inner(self) -> HttpResponse {
    self.inner
  }

  /// The body parsed as JSON. The first call reads the stream, later calls
  /// return the cached value.
  pub async fn body_json(&mut self) -> Result<&Value> {
    let value = match self.body_json.take() {
      Some(value) => {
        trace!("Using cached response body");
        value
      }
      None => self.read_body_json().await?,
    };
    Ok(self.body_json.insert(value))
  }

  async fn read_body_json(&mut self) -> Result<Value> {
    if self.inner.is_disposed() {
      return Err(Error::Precondition("response has already been disposed.".to_string()));
    }
    let body = self
      .inner
      .take_body()
      .ok_or_else(|| Error::Parse("response body is not available".to_string()))?;

    let chunks: Vec<Bytes> = body.try_collect().await.map_err(Error::transport)?;
    let bytes = chunks.concat();
    trace!("Read response body of {} bytes", bytes.len());

    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Err(Error::Parse("response body is empty".to_string()));
    }
    serde_json::from_slice(&bytes).map_err(|e| Error::Parse(e.to_string()))
  }

  /// The body parsed as a JSON object
  pub async fn body_json_object(&mut self) -> Result<&Map<String, Value>> {
    match self.body_json().await? {
      Value::Object(object) => Ok(object),
      other => Err(Error::Parse(format!("expected a JSON object but found {}", json::type_name(other)))),
    }
  }

  /// The body parsed as a JSON array
  pub async fn body_json_array(&mut self) -> Result<&Vec<Value>> {
    match self.body_json().await? {
      Value::Array(array) => Ok(array),
      other => Err(Error::Parse(format!("expected a JSON array but found {}", json::type_name(other)))),
    }
  }

  /// Whether this response carries a client error status
  pub fn is_error_response(&self) -> bool {
    is_error_status(self.status_code())
  }

  /// The structured error body. Only valid for error responses.
  pub async fn error_response(&mut self) -> Result<ErrorResponse> {
    if !self.is_error_response() {
      return Err(Error::Precondition(format!(
        "status code {} is not an error status.",
        self.status_code()
      )));
    }
    let body = self.body_json_object().await?;
    Ok(ErrorResponse::from_json(body))
  }

  /// Fail with [`Error::Api`] when this is an error response
  pub async fn error_for_status(&mut self) -> Result<()> {
    if !self.is_error_response() {
      return Ok(());
    }
    let status_code = self.status_code();
    let error_response = self.error_response().await?;
    debug!(
      "GitHub returned {}: {}",
      status_code,
      error_response.message().unwrap_or_default()
    );
    Err(Error::Api(ApiError::new(status_code, error_response)?))
  }
}

impl From<HttpResponse> for GitHubResponse {
  fn from(inner: HttpResponse) -> Self {
    Self::new(inner)
  }
}
