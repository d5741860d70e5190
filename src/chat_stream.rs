//! Assistant stream pipeline: `/chat/stream` records applied to the current conversation
//! and handed on to the caller in arrival order.

use async_stream::stream;
use clyre_api::{await_or_cancel, CancellationSignal, ClyreApiError, StreamEvent, StreamEventKind};
use futures_util::{Stream, StreamExt};
use tracing::{debug, error, warn};

use crate::thread_store::ThreadStore;

impl ThreadStore {
    /// Stream the assistant reply to `prompt` into the current conversation.
    ///
    /// Nothing is sent until the returned stream is first polled. Every event is applied to
    /// state before it is yielded; `done` also waits for the catalog refresh. Failures and
    /// cancellation end the stream instead of surfacing as items. Partial assistant text
    /// stays where it is, and the generating flag is cleared on every exit, including when
    /// the stream is dropped early.
    pub fn assistant_stream(
        &self,
        prompt: String,
        access_token: String,
        cancellation: Option<CancellationSignal>,
    ) -> impl Stream<Item = StreamEvent> + '_ {
        stream! {
            let thread_id = self.current_id();
            let opened = self
                .api
                .open_chat_stream(&thread_id, &prompt, &access_token, cancellation.as_ref())
                .await;

            match opened {
                Err(error) => report_stream_error(&error),
                Ok(mut records) => {
                    let _generating = self.begin_generation();
                    loop {
                        let next = await_or_cancel(records.next(), cancellation.as_ref()).await;
                        let next = match next {
                            Ok(next) => next,
                            Err(error) => {
                                report_stream_error(&error);
                                break;
                            }
                        };
                        let event = match next {
                            Some(Ok(event)) => event,
                            Some(Err(error)) => {
                                report_stream_error(&ClyreApiError::from(error));
                                break;
                            }
                            None => break,
                        };

                        self.apply_stream_event(&event).await;
                        yield event;
                    }
                    drop(records);
                }
            }
        }
    }

    async fn apply_stream_event(&self, event: &StreamEvent) {
        match event.kind() {
            StreamEventKind::UserMessageCommitted | StreamEventKind::AssistantMessageCommitted => {
                if let Some(id) = event.conversation_id() {
                    if self.adopt_conversation_id(id) {
                        debug!(thread_id = id, "adopted server conversation id");
                    }
                }
            }
            StreamEventKind::Chunk => {
                if let Some(chunk) = event.chunk.as_deref().filter(|chunk| !chunk.is_empty()) {
                    self.append_assistant_chunk(chunk);
                }
            }
            StreamEventKind::Done => {
                self.touch_update_time();
                if let Err(error) = self.refresh_catalog().await {
                    warn!(%error, "catalog refresh after stream failed");
                }
            }
            StreamEventKind::Unknown => {
                warn!(event = %event.event, "ignoring unknown stream event");
            }
        }
    }
}

fn report_stream_error(error: &ClyreApiError) {
    if error.is_cancelled() {
        debug!("assistant stream cancelled");
    } else {
        error!(%error, "assistant stream failed");
    }
}
