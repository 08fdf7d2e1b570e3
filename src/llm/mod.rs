//! LLM adapters for summarization and structured field extraction.
//!
//! Both adapters sit on a shared OpenAI-compatible chat-completions client and absorb
//! every underlying failure into a safe default (empty summary, empty field record), so
//! the pipeline never branches on their errors.

pub mod extract;
pub mod summarize;

pub use extract::{FieldExtractor, LlmFieldExtractor, ResumeFields};
pub use summarize::{LlmSummarizer, Summarizer};

use crate::config::get_config;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors raised by the chat completions client.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP layer failed before receiving a response.
    #[error("Chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Provider responded with an unexpected status code.
    #[error("Unexpected chat response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the provider.
        status: reqwest::StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Provider response carried no usable completion.
    #[error("Malformed chat response: {0}")]
    InvalidResponse(String),
}

/// Minimal OpenAI-compatible chat completions client.
pub struct ChatClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Construct a client for the given chat completions endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Result<Self, ChatError> {
        let http = Client::builder().user_agent("applicantbuddy/0.1").build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        })
    }

    /// Construct a client using configuration derived from the environment.
    pub fn from_config() -> Result<Self, ChatError> {
        let config = get_config();
        Self::new(
            config.llm_url.clone(),
            config.llm_api_key.clone(),
            config.llm_model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Run one completion and return the assistant message content.
    ///
    /// `json_mode` asks the provider to emit a JSON object, used by the field extractor.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
        json_mode: bool,
    ) -> Result<String, ChatError> {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_content },
            ],
        });
        if json_mode && let Some(map) = body.as_object_mut() {
            map.insert("response_format".into(), json!({ "type": "json_object" }));
        }

        let mut request = self.http.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key
            && !key.is_empty()
        {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::UnexpectedStatus { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ChatError::InvalidResponse("no completion choices".to_string()))?;
        Ok(content)
    }
}
