//! Test doubles for the transport seam.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::Result;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

type ResponseFactory = Box<dyn Fn() -> HttpResponse + Send + Sync>;

/// Transport that records every request it is handed and answers from a
/// queue of canned responses, falling back to a fixed response once the
/// queue is empty.
#[derive(Clone)]
pub struct RecordingTransport {
  requests: Arc<Mutex<Vec<HttpRequest>>>,
  queued: Arc<Mutex<VecDeque<HttpResponse>>>,
  fallback: Arc<ResponseFactory>,
}

impl RecordingTransport {
  /// Answers every request with an empty `200 OK`
  pub fn new() -> Self {
    Self::with_fallback(|| HttpResponse::new(200))
  }

  pub fn with_fallback(fallback: impl Fn() -> HttpResponse + Send + Sync + 'static) -> Self {
    Self {
      requests: Arc::default(),
      queued: Arc::default(),
      fallback: Arc::new(Box::new(fallback)),
    }
  }

  pub fn enqueue(&self, response: HttpResponse) -> &Self {
    self.queued.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
    self
  }

  /// Every request sent so far, in order
  pub fn requests(&self) -> Vec<HttpRequest> {
    self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn last_request(&self) -> HttpRequest {
    self.requests().pop().expect("no request was sent")
  }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
    self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
    let queued = self.queued.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
    Ok(queued.unwrap_or_else(|| (self.fallback)()))
  }
}
