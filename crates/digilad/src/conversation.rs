//! The transcript layer behind the assistant window.
//!
//! `Conversation` owns the visible messages and runs one exchange at a time:
//! it pushes the user's message plus an empty assistant placeholder, streams
//! the reply into that placeholder, and on any failure replaces the pending
//! entry with a visible error message so the window never shows a silent
//! blank reply.

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::client::AssistantClient;
use crate::decode::StreamDecoder;
use crate::errors::{ChatError, ChatResult};
use crate::models::DisplayMessage;

pub struct Conversation {
    client: AssistantClient,
    transcript: Vec<DisplayMessage>,
    in_flight: bool,
}

impl Conversation {
    pub fn new(client: AssistantClient) -> Self {
        Conversation {
            client,
            transcript: Vec::new(),
            in_flight: false,
        }
    }

    pub fn transcript(&self) -> &[DisplayMessage] {
        &self.transcript
    }

    pub fn is_streaming(&self) -> bool {
        self.in_flight
    }

    /// Run one exchange. At most one may be in flight per conversation; a
    /// second call while one is running is rejected rather than queued.
    pub async fn send(&mut self, text: &str, cancel: &CancellationToken) -> ChatResult<()> {
        if self.in_flight {
            return Err(ChatError::ExchangeInFlight);
        }
        self.in_flight = true;

        self.transcript.push(DisplayMessage::user(text));
        let pending = DisplayMessage::pending_assistant();
        let pending_id = pending.id.clone();
        self.transcript.push(pending);

        let mut guard = ExchangeGuard {
            conversation: self,
            pending_id,
            completed: false,
        };
        let result = guard
            .conversation
            .stream_reply(text, &guard.pending_id, cancel)
            .await;
        if result.is_ok() {
            guard.completed = true;
        }
        drop(guard);

        if let Err(err) = &result {
            tracing::error!("exchange failed: {err}");
            self.transcript
                .push(DisplayMessage::system(format!("Error: {err}")));
        }

        result
    }

    /// Releases the in-flight flag and removes the unfinished placeholder on
    /// every exit path, including the `send` future being dropped mid-await.
    fn finish_exchange(&mut self, pending_id: &str, completed: bool) {
        self.in_flight = false;
        if !completed {
            self.transcript.retain(|message| message.id != pending_id);
        }
    }

    async fn stream_reply(
        &mut self,
        text: &str,
        pending_id: &str,
        cancel: &CancellationToken,
    ) -> ChatResult<()> {
        let request = self.client.stateless_request(text);
        let response = self.client.post_chat(&request).await?;

        let mut stream = response.bytes_stream();
        let mut decoder = StreamDecoder::new();
        let mut accumulated = String::new();

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ChatError::Cancelled),
                chunk = stream.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    accumulated.push_str(&decoder.decode(&bytes)?);
                    if let Some(entry) = self
                        .transcript
                        .iter_mut()
                        .find(|message| message.id == pending_id)
                    {
                        entry.set_content(&accumulated);
                    }
                }
                Some(Err(err)) => return Err(ChatError::Transport(err)),
                None => break,
            }
        }

        decoder.finish()?;
        tracing::debug!(length = accumulated.len(), "assistant reply completed");
        Ok(())
    }
}

/// Scopes one exchange. Dropping it releases the conversation via
/// [`Conversation::finish_exchange`], so an abandoned `send` future cannot
/// leave the conversation stuck streaming.
struct ExchangeGuard<'a> {
    conversation: &'a mut Conversation,
    pending_id: String,
    completed: bool,
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        let completed = self.completed;
        self.conversation.finish_exchange(&self.pending_id, completed);
    }
}
