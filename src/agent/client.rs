//! Client for the external AI text-generation endpoint
//!
//! Accepts the ordered role/content sequence built by the context layer plus
//! the current prompt, and returns generated text. Failures and timeouts map
//! to [`Error::Service`] and are never retried here; callers supply
//! deterministic fallback content so the user always gets a reply.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::ContextMessage;
use crate::{Error, Result};

/// Deterministic reply callers use when the AI service fails
pub const FALLBACK_REPLY: &str =
    "I'm having trouble gathering my thoughts right now. I'm still here — tell me more?";

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat-completion client for companion replies
pub struct CompanionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl CompanionClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(base_url: String, api_key: String, model: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "AI service API key required".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
            timeout,
        })
    }

    /// Generate a reply from the context window and the current message
    ///
    /// # Errors
    ///
    /// Returns `Error::Service` if the call fails, times out, or the
    /// response carries no text
    pub async fn chat(&self, context: &[ContextMessage], prompt: &str) -> Result<String> {
        let mut messages: Vec<RequestMessage<'_>> = context
            .iter()
            .map(|m| RequestMessage {
                role: &m.role,
                content: &m.content,
            })
            .collect();
        messages.push(RequestMessage {
            role: "user",
            content: prompt,
        });

        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: 400,
            temperature: 0.7,
        };

        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&request)
                .send(),
        )
        .await
        .map_err(|_| Error::Service("AI service request timed out".to_string()))?
        .map_err(|e| Error::Service(format!("AI service request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Service(format!(
                "AI service returned {}",
                response.status()
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("invalid AI service response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Service("AI service returned no text".to_string()))
    }
}
