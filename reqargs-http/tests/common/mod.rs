#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use http::Request;
use http_body::{Body, Frame, SizeHint};
use http_body_util::Full;
use reqargs_http::ArgsRequest;

/// Body that yields its data in small chunks and counts every poll.
///
/// Reading it to the end takes one poll per chunk plus one for the end of
/// the stream; any further read of the underlying stream adds polls.
pub struct ChunkedBody {
    chunks: VecDeque<Bytes>,
    polls: Arc<AtomicUsize>,
}

/// Poll counter of a [`ChunkedBody`].
#[derive(Clone)]
pub struct Polls {
    count: Arc<AtomicUsize>,
    chunks: usize,
}

impl Polls {
    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Polls needed to read the body exactly once.
    pub fn single_read(&self) -> usize {
        self.chunks + 1
    }
}

impl ChunkedBody {
    pub fn new(data: &'static str, chunk_size: usize) -> (Self, Polls) {
        let data = Bytes::from_static(data.as_bytes());
        let chunks: VecDeque<Bytes> = (0..data.len())
            .step_by(chunk_size)
            .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
            .collect();
        let polls = Polls {
            count: Arc::new(AtomicUsize::new(0)),
            chunks: chunks.len(),
        };
        let body = Self {
            chunks,
            polls: Arc::clone(&polls.count),
        };
        (body, polls)
    }
}

impl Body for ChunkedBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        this.polls.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(this.chunks.pop_front().map(|chunk| Ok(Frame::data(chunk))))
    }

    fn is_end_stream(&self) -> bool {
        self.chunks.is_empty()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.chunks.iter().map(|chunk| chunk.len() as u64).sum())
    }
}

pub fn get(uri: &str) -> ArgsRequest<Full<Bytes>> {
    let request = Request::builder()
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap();
    ArgsRequest::from_request(request)
}

pub fn post(uri: &str, content_type: &str, body: &'static str) -> ArgsRequest<Full<Bytes>> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap();
    ArgsRequest::from_request(request)
}

/// POST request whose body arrives four bytes at a time.
pub fn chunked_post(content_type: &str, body: &'static str) -> (ArgsRequest<ChunkedBody>, Polls) {
    let (body, polls) = ChunkedBody::new(body, 4);
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", content_type)
        .body(body)
        .unwrap();
    (ArgsRequest::from_request(request), polls)
}
