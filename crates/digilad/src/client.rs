//! HTTP client for the relay's chat endpoint.
//!
//! `AssistantClient` constructs the call and hands the raw streamable
//! response back to the caller; it does not decide how the UI updates.
//! See [`crate::conversation`] for the read loop.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::errors::{ChatError, ChatResult};
use crate::models::ChatRequest;

/// Path prefix the site serves its API under.
pub const DEFAULT_API_PREFIX: &str = "/_api";

/// Shape of the relay's non-streaming failure payloads.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct AssistantClient {
    client: Client,
    base_url: String,
    system_prompt: String,
}

impl AssistantClient {
    /// `base_url` is the origin plus API prefix, e.g.
    /// `http://127.0.0.1:3000/_api`.
    pub fn new<S: Into<String>>(base_url: S) -> ChatResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(AssistantClient {
            client,
            base_url: base_url.into(),
            system_prompt: crate::prompt::OPERATOR_PROMPT.to_string(),
        })
    }

    /// Point at a site origin and use the standard API prefix:
    /// `http://127.0.0.1:3000` becomes `http://127.0.0.1:3000/_api`.
    pub fn from_origin<S: AsRef<str>>(origin: S) -> ChatResult<Self> {
        Self::new(format!(
            "{}{}",
            origin.as_ref().trim_end_matches('/'),
            DEFAULT_API_PREFIX
        ))
    }

    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Build the outgoing request for one exchange: the fixed system
    /// instruction plus the latest user message only.
    pub fn stateless_request(&self, user: &str) -> ChatRequest {
        ChatRequest::stateless(&self.system_prompt, user)
    }

    /// POST the request and return the raw response for the caller to
    /// stream-read. A non-success status is turned into `ChatError::Api`
    /// before any stream byte is read, with a best-effort attempt to pull a
    /// structured `error` message out of the body.
    pub async fn post_chat(&self, request: &ChatRequest) -> ChatResult<reqwest::Response> {
        let url = format!("{}/ai/chat", self.base_url.trim_end_matches('/'));

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("AI chat request failed with status {}", status.as_u16()),
            };
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AssistantClient {
        AssistantClient::new(server.uri())
            .unwrap()
            .with_system_prompt("test prompt")
    }

    #[tokio::test]
    async fn returns_response_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("partial reply"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .post_chat(&client.stateless_request("hi"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "partial reply");
    }

    #[tokio::test]
    async fn from_origin_targets_standard_api_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/_api/ai/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = AssistantClient::from_origin(server.uri())
            .unwrap()
            .with_system_prompt("test prompt");
        let response = client
            .post_chat(&client.stateless_request("hi"))
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn non_success_short_circuits_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .post_chat(&client.stateless_request("hi"))
            .await
            .unwrap_err();
        match err {
            ChatError::Api { status, .. } => assert_eq!(status, 404),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn extracts_structured_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Server configuration error: missing API key."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .post_chat(&client.stateless_request("hi"))
            .await
            .unwrap_err();
        match err {
            ChatError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Server configuration error: missing API key.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sends_exactly_two_messages_regardless_of_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        // Two exchanges back to back; each outgoing request must still carry
        // only the system prompt and the latest user message.
        client
            .post_chat(&client.stateless_request("first question"))
            .await
            .unwrap();
        client
            .post_chat(&client.stateless_request("second question"))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        let body: ChatRequest = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, Role::System);
        assert_eq!(body.messages[0].content, "test prompt");
        assert_eq!(body.messages[1].role, Role::User);
        assert_eq!(body.messages[1].content, "second question");
    }
}
