//! # GitHub Requests
//!
//! Mutable builder for one outbound call. Decorators clone a request before
//! changing it: headers are deep-copied and the body content is shared.

use std::fmt::Display;

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::body::{ByteStream, RequestBody};
use crate::consts::TOKEN_SCHEME;
use crate::error::{Error, Result, ensure_not_empty};
use crate::json;

/// A request to send to a GitHub endpoint
#[derive(Debug, Clone, Default)]
pub struct GitHubRequest {
  method: Option<Method>,
  base_url: Option<Url>,
  path: Option<String>,
  headers: HeaderMap,
  body: Option<RequestBody>,
}

impl GitHubRequest {
  /// Create an empty request
  pub fn new() -> Self {
    Self::default()
  }

  pub fn method(&self) -> Option<&Method> {
    self.method.as_ref()
  }

  pub fn set_method(&mut self, method: Method) -> &mut Self {
    self.method = Some(method);
    self
  }

  /// Set the method from its textual form. Extension methods are allowed.
  pub fn set_method_str(&mut self, method: &str) -> Result<&mut Self> {
    ensure_not_empty(method, "method")?;
    let method = Method::from_bytes(method.as_bytes())
      .map_err(|e| Error::Precondition(format!("method {method:?} is not a valid HTTP method: {e}")))?;
    Ok(self.set_method(method))
  }

  /// Base URL override. When absent the client's base URL is used.
  pub fn base_url(&self) -> Option<&Url> {
    self.base_url.as_ref()
  }

  pub fn set_base_url(&mut self, base_url: Url) -> &mut Self {
    self.base_url = Some(base_url);
    self
  }

  pub fn set_base_url_str(&mut self, base_url: &str) -> Result<&mut Self> {
    ensure_not_empty(base_url, "baseUrl")?;
    let base_url = Url::parse(base_url)?;
    Ok(self.set_base_url(base_url))
  }

  pub fn path(&self) -> Option<&str> {
    self.path.as_deref()
  }

  /// Set the path, optionally with a query string (`/user/repos?per_page=10`)
  pub fn set_path(&mut self, path: &str) -> Result<&mut Self> {
    ensure_not_empty(path, "path")?;
    self.path = Some(path.to_string());
    Ok(self)
  }

  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  /// Value of a header, looked up case-insensitively
  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).and_then(|value| value.to_str().ok())
  }

  /// Set a header, replacing any existing value. Numbers and other
  /// displayable values are stored in their string form.
  pub fn set_header(&mut self, name: &str, value: impl Display) -> Result<&mut Self> {
    ensure_not_empty(name, "headerName")?;
    let header_name = HeaderName::from_bytes(name.as_bytes())
      .map_err(|e| Error::Precondition(format!("header name {name:?} is invalid: {e}")))?;
    let header_value = HeaderValue::from_str(&value.to_string())
      .map_err(|e| Error::Precondition(format!("value for header {name:?} is invalid: {e}")))?;
    self.headers.insert(header_name, header_value);
    Ok(self)
  }

  /// Set `Authorization: token {token}`
  pub fn set_authorization_header(&mut self, token: &str) -> Result<&mut Self> {
    let value = authorization_value(token)?;
    self.headers.insert(AUTHORIZATION, value);
    Ok(self)
  }

  /// Copy every header from `headers` into this request. Later entries win.
  pub fn set_headers(&mut self, headers: &HeaderMap) -> &mut Self {
    for (name, value) in headers {
      self.headers.insert(name.clone(), value.clone());
    }
    self
  }

  pub fn body(&self) -> Option<&RequestBody> {
    self.body.as_ref()
  }

  /// Length of the body, or `0` when there is none
  pub fn body_length(&self) -> u64 {
    self.body.as_ref().map_or(0, RequestBody::len)
  }

  /// Attach a body. A streamed body that was already consumed is rejected.
  pub fn set_body(&mut self, body: RequestBody) -> Result<&mut Self> {
    if body.is_consumed() {
      return Err(Error::Precondition("body has already been consumed.".to_string()));
    }
    self.body = Some(body);
    Ok(self)
  }

  pub fn set_body_stream(&mut self, length: u64, stream: ByteStream) -> &mut Self {
    self.body = Some(RequestBody::from_stream(length, stream));
    self
  }

  pub fn set_body_bytes(&mut self, bytes: impl Into<Bytes>) -> &mut Self {
    self.body = Some(RequestBody::from_bytes(bytes));
    self
  }

  /// Set a UTF-8 text body
  pub fn set_body_text(&mut self, text: &str) -> &mut Self {
    self.set_body_bytes(text.to_string())
  }

  /// Set the body to the compact text form of a JSON object or array
  pub fn set_body_json(&mut self, json: &Value) -> Result<&mut Self> {
    if !(json.is_object() || json.is_array()) {
      return Err(Error::Precondition(format!(
        "body JSON must be an object or an array, but was {}.",
        json::type_name(json)
      )));
    }
    Ok(self.set_body_text(&json.to_string()))
  }

  /// Full URL for this request: the effective base URL (override or
  /// `default_base_url`) with the path appended to the base URL's path.
  pub fn resolve_url(&self, default_base_url: &Url) -> Result<Url> {
    let path = self
      .path
      .as_deref()
      .ok_or_else(|| Error::Precondition("request.path cannot be null.".to_string()))?;
    let base_url = self.base_url.as_ref().unwrap_or(default_base_url);

    let (path, query) = match path.split_once('?') {
      Some((path, query)) => (path, Some(query)),
      None => (path, None),
    };

    let mut url = base_url.clone();
    let joined = format!(
      "{}/{}",
      base_url.path().trim_end_matches('/'),
      path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url.set_query(query);
    Ok(url)
  }
}

/// Build the `token {token}` authorization header value. The value is marked
/// sensitive so it is redacted from debug output.
pub(crate) fn authorization_value(token: &str) -> Result<HeaderValue> {
  ensure_not_empty(token, "accessToken")?;
  let mut value = HeaderValue::from_str(&format!("{TOKEN_SCHEME} {token}"))
    .map_err(|e| Error::Precondition(format!("access token is not a valid header value: {e}")))?;
  value.set_sensitive(true);
  Ok(value)
}
