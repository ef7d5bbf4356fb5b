//! The chat relay endpoint.
//!
//! Forwards the incoming message sequence to the upstream chat-completion
//! provider in streaming mode, then reframes the provider's SSE records into
//! a raw plain-text stream whose concatenation is the assistant's full
//! reply. Errors before the first emitted byte are structured JSON; once the
//! plain-text channel is open, a failure terminates the stream instead.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use digilad::decode::StreamDecoder;
use digilad::models::{ChatMessage, ChatRequest};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::state::AppState;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize)]
struct UpstreamRequest<'a> {
    messages: &'a [ChatMessage],
    model: &'a str,
    stream: bool,
}

// Narrowly-typed view of the upstream delta envelope; everything we do not
// consume is ignored during deserialization.
#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

fn error_response(status: StatusCode, error: &str, details: Option<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
        .into_response()
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, &rejection.body_text(), None);
        }
    };

    // Fail closed before any upstream connection is attempted.
    let Some(api_key) = state.upstream.api_key.clone() else {
        tracing::error!("upstream API key is not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error: missing API key.",
            None,
        );
    };

    let url = format!(
        "{}/v1/chat/completions",
        state.upstream.host.trim_end_matches('/')
    );
    let upstream = match state
        .http
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&UpstreamRequest {
            messages: &request.messages,
            model: &state.upstream.model,
            stream: true,
        })
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("failed to reach upstream provider: {err}");
            return error_response(
                StatusCode::BAD_GATEWAY,
                "Failed to fetch response from AI service.",
                Some(err.to_string()),
            );
        }
    };

    let status = upstream.status();
    if !status.is_success() {
        let details = upstream.text().await.unwrap_or_default();
        tracing::error!("upstream provider error: {status} {details}");
        let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        return error_response(
            status,
            "Failed to fetch response from AI service.",
            Some(details),
        );
    }

    let (tx, rx) = mpsc::channel::<Result<Bytes, std::io::Error>>(32);
    let mut upstream_body = upstream.bytes_stream();

    tokio::spawn(async move {
        let mut decoder = StreamDecoder::new();
        let mut buffer = String::new();

        'read: while let Some(chunk) = upstream_body.next().await {
            let text = match chunk
                .map_err(std::io::Error::other)
                .and_then(|bytes| decoder.decode(&bytes).map_err(std::io::Error::other))
            {
                Ok(text) => text,
                Err(err) => {
                    // Output already committed to plain text; terminate the
                    // stream instead of injecting a JSON payload.
                    tracing::error!("error while reading upstream stream: {err}");
                    let _ = tx.send(Err(err)).await;
                    return;
                }
            };
            buffer.push_str(&text);

            // Records are separated by a blank line; anything after the last
            // boundary stays buffered for the next chunk.
            while let Some(boundary) = buffer.find("\n\n") {
                let record = buffer[..boundary].to_string();
                buffer.drain(..boundary + 2);

                for line in record.lines() {
                    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
                        continue;
                    };
                    if data.trim() == DONE_SENTINEL {
                        break 'read;
                    }

                    let parsed: StreamChunk = match serde_json::from_str(data) {
                        Ok(parsed) => parsed,
                        Err(err) => {
                            tracing::warn!("skipping malformed upstream record: {err}");
                            continue;
                        }
                    };

                    let Some(content) = parsed
                        .choices
                        .first()
                        .and_then(|choice| choice.delta.content.as_deref())
                    else {
                        continue;
                    };
                    if content.is_empty() {
                        continue;
                    }

                    if tx
                        .send(Ok(Bytes::copy_from_slice(content.as_bytes())))
                        .await
                        .is_err()
                    {
                        // Client went away; stop reading from upstream.
                        return;
                    }
                }
            }
        }
    });

    let body = Body::from_stream(ReceiverStream::new(rx));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(body)
        .unwrap()
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/ai/chat", post(chat_handler))
        .with_state(state)
}
