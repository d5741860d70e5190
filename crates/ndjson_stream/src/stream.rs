use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures_util::Stream;
use serde::de::DeserializeOwned;

use crate::decoder::NdjsonDecoder;
use crate::error::{NdjsonError, SourceError};

/// Pull-based NDJSON record stream over a chunked byte source.
///
/// The source is dropped as soon as it reports exhaustion or an error, and the stream is
/// fused from then on. Dropping the `NdjsonStream` early releases the source as well.
pub struct NdjsonStream<T, S> {
    source: Option<Pin<Box<S>>>,
    decoder: NdjsonDecoder<T>,
    pending: VecDeque<T>,
}

// Fields are never pin-projected; the source is boxed.
impl<T, S> Unpin for NdjsonStream<T, S> {}

impl<T, S> NdjsonStream<T, S>
where
    T: DeserializeOwned + Default,
{
    pub fn new(source: S) -> Self {
        Self {
            source: Some(Box::pin(source)),
            decoder: NdjsonDecoder::default(),
            pending: VecDeque::new(),
        }
    }

    /// Open a stream over an optional body, failing with [`NdjsonError::EmptyBody`] when
    /// there is nothing to read.
    pub fn from_body(body: Option<S>) -> Result<Self, NdjsonError> {
        body.map(Self::new).ok_or(NdjsonError::EmptyBody)
    }

    /// Whether the underlying source is still held.
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    fn release(&mut self) {
        self.source = None;
    }
}

impl<T, S, B, E> Stream for NdjsonStream<T, S>
where
    T: DeserializeOwned + Default,
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<SourceError>,
{
    type Item = Result<T, NdjsonError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(record) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(record)));
            }

            let Some(source) = this.source.as_mut() else {
                return Poll::Ready(None);
            };

            match ready!(source.as_mut().poll_next(cx)) {
                Some(Ok(chunk)) => {
                    let records = this.decoder.feed(chunk.as_ref());
                    this.pending.extend(records);
                }
                Some(Err(error)) => {
                    this.release();
                    return Poll::Ready(Some(Err(NdjsonError::source_error(error))));
                }
                None => {
                    this.release();
                    this.pending.extend(this.decoder.finish());
                }
            }
        }
    }
}
