//! Request bodies.
//!
//! A [`RequestBody`] is a byte length plus content that is shared between
//! clones. In-memory content can be sent any number of times. Streamed content
//! is single-use: once a transport takes it, every request sharing the body is
//! inert.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use futures::stream::BoxStream;

/// Single-consumption stream of body bytes
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// The body of an outbound request
#[derive(Clone)]
pub struct RequestBody {
  length: u64,
  content: Arc<BodyContent>,
}

enum BodyContent {
  Buffered(Bytes),
  Streamed(Mutex<Option<ByteStream>>),
}

/// Body content handed to a transport for a single dispatch
pub enum BodyPayload {
  Buffered(Bytes),
  Streamed(ByteStream),
}

impl RequestBody {
  /// Body backed by an in-memory buffer
  pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
    let bytes = bytes.into();
    Self {
      length: bytes.len() as u64,
      content: Arc::new(BodyContent::Buffered(bytes)),
    }
  }

  /// Body backed by a stream that yields exactly `length` bytes
  pub fn from_stream(length: u64, stream: ByteStream) -> Self {
    Self {
      length,
      content: Arc::new(BodyContent::Streamed(Mutex::new(Some(stream)))),
    }
  }

  /// Number of bytes in the body
  pub fn len(&self) -> u64 {
    self.length
  }

  pub fn is_empty(&self) -> bool {
    self.length == 0
  }

  /// The buffered content, if this body is held in memory
  pub fn as_bytes(&self) -> Option<&Bytes> {
    match self.content.as_ref() {
      BodyContent::Buffered(bytes) => Some(bytes),
      BodyContent::Streamed(_) => None,
    }
  }

  /// Whether a streamed body has already been taken by a transport
  pub fn is_consumed(&self) -> bool {
    match self.content.as_ref() {
      BodyContent::Buffered(_) => false,
      BodyContent::Streamed(slot) => lock(slot).is_none(),
    }
  }

  /// Whether two bodies share the same content
  pub fn ptr_eq(this: &Self, other: &Self) -> bool {
    Arc::ptr_eq(&this.content, &other.content)
  }

  /// Take the content for dispatch. Returns `None` once a streamed body has
  /// been consumed.
  pub fn take_payload(&self) -> Option<BodyPayload> {
    match self.content.as_ref() {
      BodyContent::Buffered(bytes) => Some(BodyPayload::Buffered(bytes.clone())),
      BodyContent::Streamed(slot) => lock(slot).take().map(BodyPayload::Streamed),
    }
  }
}

fn lock(slot: &Mutex<Option<ByteStream>>) -> MutexGuard<'_, Option<ByteStream>> {
  slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl fmt::Debug for RequestBody {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let kind = match self.content.as_ref() {
      BodyContent::Buffered(_) => "buffered",
      BodyContent::Streamed(_) => "streamed",
    };
    f.debug_struct("RequestBody")
      .field("length", &self.length)
      .field("kind", &kind)
      .field("consumed", &self.is_consumed())
      .finish()
  }
}

/// `Sync` adapter for a [`ByteStream`].
///
/// The stream is only ever polled through `&mut self`, so the mutex is never
/// contended.
pub(crate) struct SyncByteStream(Mutex<ByteStream>);

impl SyncByteStream {
  pub(crate) fn new(stream: ByteStream) -> Self {
    Self(Mutex::new(stream))
  }
}

impl Stream for SyncByteStream {
  type Item = io::Result<Bytes>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let stream = self.get_mut().0.get_mut().unwrap_or_else(PoisonError::into_inner);
    stream.as_mut().poll_next(cx)
  }
}

#[cfg(test)]
mod tests {
  use futures::{StreamExt, stream};

  use super::*;

  fn chunked(chunks: Vec<&'static str>) -> ByteStream {
    stream::iter(chunks.into_iter().map(|chunk| Ok(Bytes::from_static(chunk.as_bytes())))).boxed()
  }

  #[test]
  fn test_buffered_body_can_be_taken_repeatedly() {
    let body = RequestBody::from_bytes("I'm a body!");
    assert_eq!(body.len(), 11);
    assert!(!body.is_empty());

    for _ in 0..2 {
      match body.take_payload() {
        Some(BodyPayload::Buffered(bytes)) => assert_eq!(bytes, Bytes::from_static(b"I'm a body!")),
        _ => panic!("expected a buffered payload"),
      }
    }
    assert!(!body.is_consumed());
  }

  #[tokio::test]
  async fn test_streamed_body_is_single_use_across_clones() {
    let body = RequestBody::from_stream(10, chunked(vec!["hello", "world"]));
    let clone = body.clone();
    assert!(RequestBody::ptr_eq(&body, &clone));
    assert!(body.as_bytes().is_none());

    let Some(BodyPayload::Streamed(stream)) = clone.take_payload() else {
      panic!("expected a streamed payload");
    };
    let chunks: Vec<_> = stream.map(|chunk| chunk.unwrap()).collect().await;
    assert_eq!(chunks.concat(), b"helloworld".to_vec());

    assert!(body.is_consumed());
    assert!(clone.is_consumed());
    assert!(body.take_payload().is_none());
  }

  #[test]
  fn test_separate_bodies_do_not_share_content() {
    let first = RequestBody::from_bytes("same");
    let second = RequestBody::from_bytes("same");
    assert!(!RequestBody::ptr_eq(&first, &second));
  }

  #[tokio::test]
  async fn test_sync_byte_stream_yields_inner_chunks() {
    let stream = SyncByteStream::new(chunked(vec!["a", "b"]));
    let chunks: Vec<_> = stream.map(|chunk| chunk.unwrap()).collect().await;
    assert_eq!(chunks, vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
  }
}
