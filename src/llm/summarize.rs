//! Bullet-point summarization of resume text.

use crate::llm::ChatClient;
use async_trait::async_trait;

const SUMMARY_PROMPT: &str = "You are a resume summarizer. \
Summarize the resume text provided as concise bullet points, one per line, each starting \
with \"- \". Cover, when present: personal information, education, work experience, \
skills, projects, certifications, interests, and references. Keep each bullet direct and \
concise.";

/// Produces a free-text summary of resume text; never fails.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the text, falling back to an empty string on failure.
    async fn summarize(&self, text: &str) -> String;
}

/// Summarizer backed by the chat completions client.
pub struct LlmSummarizer {
    chat: ChatClient,
}

impl LlmSummarizer {
    /// Wrap a chat client for summarization.
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str) -> String {
        let user_content = format!("Resume text: {text}");
        match self.chat.complete(SUMMARY_PROMPT, &user_content, false).await {
            Ok(summary) => summary.trim().to_string(),
            Err(error) => {
                tracing::warn!(error = %error, "Summarization failed; using empty summary");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn summarizer(base_url: String) -> LlmSummarizer {
        LlmSummarizer::new(ChatClient::new(base_url, None, "test-model").expect("client"))
    }

    #[tokio::test]
    async fn returns_trimmed_summary_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "content": "\n- Senior engineer\n- Python, AWS\n" } }]
                }));
            })
            .await;

        let summary = summarizer(server.base_url()).summarize("resume body").await;
        assert_eq!(summary, "- Senior engineer\n- Python, AWS");
    }

    #[tokio::test]
    async fn provider_failure_yields_empty_summary() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(502).body("bad gateway");
            })
            .await;

        let summary = summarizer(server.base_url()).summarize("resume body").await;
        assert!(summary.is_empty());
    }
}
