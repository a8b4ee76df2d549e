//! Response body.
//!
//! Receipts, statements, media payloads and error documents are all produced
//! in full before the response is built, so a body is one chunk or nothing.
//! HEAD responses, `204`s and auth failures carry nothing.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};

/// Single-chunk response body.
#[derive(Debug, Clone, Default)]
pub struct SwordResponseBody {
    chunk: Option<Bytes>,
}

impl SwordResponseBody {
    /// Body carrying `data`. Empty input yields an empty body.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            chunk: (!data.is_empty()).then_some(data),
        }
    }

    /// Body carrying nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Body carrying a UTF-8 string.
    #[must_use]
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::from_bytes(text.into())
    }
}

impl Body for SwordResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().chunk.take().map(|chunk| Ok(Frame::data(chunk))))
    }

    fn is_end_stream(&self) -> bool {
        self.chunk.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.chunk.as_ref().map_or(0, |chunk| chunk.len() as u64))
    }
}
