//! Request body buffering.
//!
//! Form and JSON parsing both need the whole body, and the body stream can
//! only be read once. [`BufferedBody`] records which state the body is in:
//!
//! - **Passthrough**: not read yet, forwarded untouched
//! - **Complete**: fully read into memory, replayed on demand
//! - **Partial**: reading stopped early (size limit or stream error); holds
//!   the bytes read so far plus the rest of the stream or its error
//!
//! Whatever the parser did, the request can be turned back into an
//! [`http::Request`] and handed to the handler, which then streams the same
//! bytes (and the same error, if any) as if nothing had been read.

use bytes::{Buf, Bytes, BytesMut};
use http_body::{Body as HttpBody, Frame, SizeHint};
use http_body_util::BodyExt;
use pin_project::pin_project;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;

/// Error reading or decoding the request body.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The underlying stream failed. The error itself stays in the body.
    #[error("body stream failed after {read} bytes")]
    Interrupted {
        /// Bytes received before the failure.
        read: usize,
    },

    /// The body exceeds the configured limit.
    #[error("body exceeds the limit of {limit} bytes")]
    TooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The body is not valid urlencoded form data.
    #[error("invalid form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// The body is not valid multipart form data.
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] multer::Error),
}

/// What is left of a body after reading stopped early.
#[pin_project(project = RemainingProj)]
pub enum Remaining<B>
where
    B: HttpBody,
{
    /// The stream continues.
    Body(#[pin] B),
    /// The stream failed; the error is yielded once, then the body ends.
    Error(Option<B::Error>),
}

/// Bytes already read followed by the rest of the body.
#[pin_project]
pub struct PartialBody<B>
where
    B: HttpBody,
{
    prefix: Option<Bytes>,
    #[pin]
    remaining: Remaining<B>,
}

impl<B> PartialBody<B>
where
    B: HttpBody,
{
    pub fn new(prefix: Option<Bytes>, remaining: Remaining<B>) -> Self {
        Self {
            prefix: prefix.filter(|bytes| !bytes.is_empty()),
            remaining,
        }
    }

    pub fn prefix(&self) -> Option<&Bytes> {
        self.prefix.as_ref()
    }

    pub fn into_parts(self) -> (Option<Bytes>, Remaining<B>) {
        (self.prefix, self.remaining)
    }
}

impl<B> HttpBody for PartialBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.project();
        if let Some(prefix) = this.prefix.take() {
            return Poll::Ready(Some(Ok(Frame::data(prefix))));
        }
        match this.remaining.project() {
            RemainingProj::Body(body) => poll_bytes(body, cx),
            RemainingProj::Error(error) => Poll::Ready(error.take().map(Err)),
        }
    }

    fn size_hint(&self) -> SizeHint {
        let prefix = self.prefix.as_ref().map_or(0, |bytes| bytes.len() as u64);
        match &self.remaining {
            Remaining::Body(body) => {
                let inner = body.size_hint();
                let mut hint = SizeHint::new();
                hint.set_lower(inner.lower().saturating_add(prefix));
                if let Some(upper) = inner.upper() {
                    hint.set_upper(upper.saturating_add(prefix));
                }
                hint
            }
            Remaining::Error(_) => SizeHint::with_exact(prefix),
        }
    }

    fn is_end_stream(&self) -> bool {
        self.prefix.is_none()
            && match &self.remaining {
                Remaining::Body(body) => body.is_end_stream(),
                Remaining::Error(error) => error.is_none(),
            }
    }
}

fn poll_bytes<B>(
    body: Pin<&mut B>,
    cx: &mut Context<'_>,
) -> Poll<Option<Result<Frame<Bytes>, B::Error>>>
where
    B: HttpBody,
{
    match body.poll_frame(cx) {
        Poll::Ready(Some(Ok(frame))) => {
            let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
            Poll::Ready(Some(Ok(frame)))
        }
        Poll::Ready(Some(Err(error))) => Poll::Ready(Some(Err(error))),
        Poll::Ready(None) => Poll::Ready(None),
        Poll::Pending => Poll::Pending,
    }
}

/// A request body that is untouched, fully buffered or partially read.
#[pin_project(project = BufferedBodyProj)]
pub enum BufferedBody<B>
where
    B: HttpBody,
{
    /// Body was fully read.
    ///
    /// The `Option` is used to yield the data once, then return `None` on subsequent polls.
    Complete(Option<Bytes>),

    /// Reading stopped early.
    Partial(#[pin] PartialBody<B>),

    /// Body was not read.
    Passthrough(#[pin] B),
}

impl<B> HttpBody for BufferedBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            BufferedBodyProj::Complete(data) => match data.take() {
                Some(bytes) => Poll::Ready(Some(Ok(Frame::data(bytes)))),
                None => Poll::Ready(None),
            },
            BufferedBodyProj::Partial(partial) => partial.poll_frame(cx),
            BufferedBodyProj::Passthrough(body) => poll_bytes(body, cx),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            BufferedBody::Complete(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            BufferedBody::Complete(None) => SizeHint::with_exact(0),
            BufferedBody::Partial(partial) => partial.size_hint(),
            BufferedBody::Passthrough(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            BufferedBody::Complete(data) => data.as_ref().is_none_or(Bytes::is_empty),
            BufferedBody::Partial(partial) => partial.is_end_stream(),
            BufferedBody::Passthrough(body) => body.is_end_stream(),
        }
    }
}

impl<B> BufferedBody<B>
where
    B: HttpBody + Unpin,
{
    /// Buffered bytes, if the body has been read completely.
    pub fn buffered(&self) -> Option<Bytes> {
        match self {
            BufferedBody::Complete(data) => Some(data.clone().unwrap_or_default()),
            BufferedBody::Partial(_) | BufferedBody::Passthrough(_) => None,
        }
    }

    /// Collects the entire body into bytes.
    ///
    /// With a `limit`, reading stops with [`BodyError::TooLarge`] as soon as
    /// more than `limit` bytes were received. On any error the body comes
    /// back as well, holding every byte read so far and the unread rest of
    /// the stream (or the stream's error), so nothing is lost for whoever
    /// consumes the body next. Trailers are not kept.
    pub async fn collect_limited(self, limit: Option<usize>) -> Result<Bytes, (Self, BodyError)> {
        let (prefix, remaining) = match self {
            BufferedBody::Complete(data) => {
                let bytes = data.unwrap_or_default();
                return match limit {
                    Some(limit) if bytes.len() > limit => Err((
                        BufferedBody::Complete(Some(bytes)),
                        BodyError::TooLarge { limit },
                    )),
                    _ => Ok(bytes),
                };
            }
            BufferedBody::Partial(partial) => partial.into_parts(),
            BufferedBody::Passthrough(body) => (None, Remaining::Body(body)),
        };

        let mut buffer = BytesMut::new();
        if let Some(prefix) = prefix {
            buffer.extend_from_slice(&prefix);
        }
        let mut body = match remaining {
            Remaining::Body(body) => body,
            Remaining::Error(error) => {
                let read = buffer.len();
                let partial = PartialBody::new(Some(buffer.freeze()), Remaining::Error(error));
                return Err((BufferedBody::Partial(partial), BodyError::Interrupted { read }));
            }
        };

        loop {
            if let Some(limit) = limit
                && buffer.len() > limit
            {
                let partial = PartialBody::new(Some(buffer.freeze()), Remaining::Body(body));
                return Err((BufferedBody::Partial(partial), BodyError::TooLarge { limit }));
            }
            match body.frame().await {
                Some(Ok(frame)) => {
                    if let Ok(mut data) = frame.into_data() {
                        buffer.extend_from_slice(&data.copy_to_bytes(data.remaining()));
                    }
                }
                Some(Err(error)) => {
                    let read = buffer.len();
                    let partial =
                        PartialBody::new(Some(buffer.freeze()), Remaining::Error(Some(error)));
                    return Err((BufferedBody::Partial(partial), BodyError::Interrupted { read }));
                }
                None => return Ok(buffer.freeze()),
            }
        }
    }
}

impl<B> fmt::Debug for BufferedBody<B>
where
    B: HttpBody,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferedBody::Complete(Some(bytes)) => f
                .debug_tuple("Complete")
                .field(&format_args!("{} bytes", bytes.len()))
                .finish(),
            BufferedBody::Complete(None) => f.debug_tuple("Complete").field(&"consumed").finish(),
            BufferedBody::Partial(partial) => f
                .debug_struct("Partial")
                .field("prefix_len", &partial.prefix().map_or(0, Bytes::len))
                .finish_non_exhaustive(),
            BufferedBody::Passthrough(_) => f.debug_tuple("Passthrough").finish_non_exhaustive(),
        }
    }
}
