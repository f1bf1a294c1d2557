//! HTTP transport seam.
//!
//! The client pipeline never talks to the network directly. It hands a fully
//! resolved [`HttpRequest`] to an [`HttpTransport`] and gets back an
//! [`HttpResponse`] with a streamed body. [`ReqwestTransport`] is the default
//! implementation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};
use reqwest::header::{ACCEPT, CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use tracing::{debug, instrument, trace};
use url::Url;

use crate::body::{BodyPayload, ByteStream, RequestBody, SyncByteStream};
use crate::consts::{ACCEPT as ACCEPT_GITHUB_V3, USER_AGENT};
use crate::error::{Error, Result};

/// A resolved request ready for dispatch
#[derive(Debug, Clone)]
pub struct HttpRequest {
  pub method: Method,
  pub url: Url,
  pub headers: HeaderMap,
  pub body: Option<RequestBody>,
}

/// Sends HTTP requests on behalf of a client
#[async_trait]
pub trait HttpTransport: Send + Sync {
  /// Send a request and return the raw response
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T> HttpTransport for Arc<T>
where
  T: HttpTransport + ?Sized,
{
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
    (**self).send(request).await
  }
}

/// A raw HTTP response.
///
/// The body can be read once. Disposing the response drops the body stream
/// and releases the underlying connection.
pub struct HttpResponse {
  http_version: String,
  status_code: u16,
  reason_phrase: String,
  headers: HeaderMap,
  body: Option<ByteStream>,
  disposed: bool,
}

impl HttpResponse {
  /// Create a response with an empty body and the canonical reason phrase
  pub fn new(status_code: u16) -> Self {
    let reason_phrase = StatusCode::from_u16(status_code)
      .ok()
      .and_then(|status| status.canonical_reason())
      .unwrap_or_default()
      .to_string();

    Self {
      http_version: "HTTP/1.1".to_string(),
      status_code,
      reason_phrase,
      headers: HeaderMap::new(),
      body: Some(stream::empty().boxed()),
      disposed: false,
    }
  }

  pub fn with_http_version(mut self, http_version: impl Into<String>) -> Self {
    self.http_version = http_version.into();
    self
  }

  pub fn with_reason_phrase(mut self, reason_phrase: impl Into<String>) -> Self {
    self.reason_phrase = reason_phrase.into();
    self
  }

  pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
    self.headers.insert(name, value);
    self
  }

  pub fn with_headers(mut self, headers: HeaderMap) -> Self {
    self.headers = headers;
    self
  }

  /// Use an in-memory body
  pub fn with_body(self, body: impl Into<Bytes>) -> Self {
    let body: Bytes = body.into();
    self.with_body_stream(stream::once(async move { Ok(body) }).boxed())
  }

  pub fn with_body_stream(mut self, body: ByteStream) -> Self {
    self.body = Some(body);
    self
  }

  pub fn http_version(&self) -> &str {
    &self.http_version
  }

  pub fn status_code(&self) -> u16 {
    self.status_code
  }

  pub fn reason_phrase(&self) -> &str {
    &self.reason_phrase
  }

  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  /// Take the body stream. Returns `None` once the body has been read or the
  /// response has been disposed.
  pub fn take_body(&mut self) -> Option<ByteStream> {
    self.body.take()
  }

  pub fn is_disposed(&self) -> bool {
    self.disposed
  }

  /// Release the body. Returns `true` the first time only.
  pub fn dispose(&mut self) -> bool {
    if self.disposed {
      return false;
    }
    self.body = None;
    self.disposed = true;
    true
  }
}

impl fmt::Debug for HttpResponse {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HttpResponse")
      .field("http_version", &self.http_version)
      .field("status_code", &self.status_code)
      .field("reason_phrase", &self.reason_phrase)
      .field("headers", &self.headers)
      .field("body_available", &self.body.is_some())
      .field("disposed", &self.disposed)
      .finish()
  }
}

/// [`HttpTransport`] backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client,
}

impl ReqwestTransport {
  /// Create a transport with the default `User-Agent` and GitHub v3 `Accept`
  /// headers
  pub fn new() -> Result<Self> {
    Self::with_user_agent(USER_AGENT)
  }

  pub fn with_user_agent(user_agent: &str) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_V3));

    let client = reqwest::Client::builder()
      .user_agent(user_agent)
      .default_headers(headers)
      .build()
      .map_err(Error::transport)?;

    Ok(Self { client })
  }

  /// Wrap an already configured client
  pub fn from_client(client: reqwest::Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
  #[instrument(skip(self, request), fields(method = %request.method, url = %request.url), level = "debug")]
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
    let HttpRequest {
      method,
      url,
      mut headers,
      body,
    } = request;

    let mut builder = self.client.request(method, url);

    if let Some(body) = body {
      match body.take_payload() {
        Some(BodyPayload::Buffered(bytes)) => {
          trace!("Sending buffered body of {} bytes", bytes.len());
          builder = builder.body(bytes);
        }
        Some(BodyPayload::Streamed(stream)) => {
          trace!("Sending streamed body of {} bytes", body.len());
          headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
          builder = builder.body(reqwest::Body::wrap_stream(SyncByteStream::new(stream)));
        }
        None => {
          return Err(Error::Precondition(
            "request body stream has already been consumed.".to_string(),
          ));
        }
      }
    }

    let response = builder.headers(headers).send().await.map_err(Error::transport)?;
    debug!("Received response with status {}", response.status());

    Ok(from_reqwest(response))
  }
}

fn from_reqwest(response: reqwest::Response) -> HttpResponse {
  let status = response.status();
  let http_version = format!("{:?}", response.version());
  let headers = response.headers().clone();
  let body = response.bytes_stream().map_err(std::io::Error::other).boxed();

  HttpResponse::new(status.as_u16())
    .with_http_version(http_version)
    .with_reason_phrase(status.canonical_reason().unwrap_or_default())
    .with_headers(headers)
    .with_body_stream(body)
}

#[cfg(test)]
mod tests {
  use futures::StreamExt;
  use wiremock::matchers::{body_string, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  async fn read_all(response: &mut HttpResponse) -> Vec<u8> {
    let body = response.take_body().unwrap();
    let chunks: Vec<Bytes> = body.map(|chunk| chunk.unwrap()).collect().await;
    chunks.concat()
  }

  #[test]
  fn test_new_response_uses_canonical_reason() {
    let response = HttpResponse::new(404);
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.reason_phrase(), "Not Found");
    assert_eq!(response.http_version(), "HTTP/1.1");

    assert_eq!(HttpResponse::new(599).reason_phrase(), "");
  }

  #[tokio::test]
  async fn test_dispose_returns_true_only_once() {
    let mut response = HttpResponse::new(200).with_body("{}");
    assert!(!response.is_disposed());
    assert!(response.dispose());
    assert!(response.is_disposed());
    assert!(!response.dispose());
    assert!(response.take_body().is_none());
  }

  #[tokio::test]
  async fn test_reqwest_transport_sends_default_headers() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/user"))
      .and(header("accept", ACCEPT_GITHUB_V3))
      .and(header("user-agent", USER_AGENT))
      .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"login":"octocat"}"#))
      .expect(1)
      .mount(&mock_server)
      .await;

    let transport = ReqwestTransport::new()?;
    let mut response = transport
      .send(HttpRequest {
        method: Method::GET,
        url: Url::parse(&format!("{}/user", mock_server.uri()))?,
        headers: HeaderMap::new(),
        body: None,
      })
      .await?;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.reason_phrase(), "OK");
    assert_eq!(response.http_version(), "HTTP/1.1");
    assert_eq!(read_all(&mut response).await, br#"{"login":"octocat"}"#.to_vec());
    Ok(())
  }

  #[tokio::test]
  async fn test_reqwest_transport_streams_body_with_content_length() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/upload"))
      .and(header("content-length", "10"))
      .and(body_string("helloworld"))
      .respond_with(ResponseTemplate::new(201))
      .expect(1)
      .mount(&mock_server)
      .await;

    let chunks = vec![Ok(Bytes::from_static(b"hello")), Ok(Bytes::from_static(b"world"))];
    let body = RequestBody::from_stream(10, stream::iter(chunks).boxed());
    let request = HttpRequest {
      method: Method::POST,
      url: Url::parse(&format!("{}/upload", mock_server.uri()))?,
      headers: HeaderMap::new(),
      body: Some(body),
    };

    let transport = ReqwestTransport::new()?;
    let response = transport.send(request.clone()).await?;
    assert_eq!(response.status_code(), 201);

    // The stream was consumed by the first send
    let error = transport.send(request).await.unwrap_err();
    assert!(error.is_precondition());
    Ok(())
  }

  #[tokio::test]
  async fn test_reqwest_transport_maps_connection_failures() -> anyhow::Result<()> {
    let transport = ReqwestTransport::new()?;
    let error = transport
      .send(HttpRequest {
        method: Method::GET,
        url: Url::parse("http://127.0.0.1:1/user")?,
        headers: HeaderMap::new(),
        body: None,
      })
      .await
      .unwrap_err();

    assert!(matches!(error, Error::Transport(_)));
    Ok(())
  }
}
