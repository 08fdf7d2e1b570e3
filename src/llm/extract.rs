//! Structured field extraction from resume text.

use crate::llm::ChatClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const EXTRACT_PROMPT: &str = "You are a resume information extractor. \
Extract the following information from the resume text provided and answer with a single \
JSON object using exactly these keys: \
\"full_name\" (string), \"email\" (string), \"phone\" (string), \"address\" (string), \
\"category\" (one of: software_engineer, data_scientist, product_manager, \
marketing_manager, sales_manager, other), \
\"skills\" (list of technical and professional skills), \
\"strengths\" (list of key strengths, maximum 5 words each). \
If any information is not available, provide an empty string for strings or an empty list \
for lists.";

/// Typed fields pulled out of resume text. Every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFields {
    /// Full name of the candidate.
    #[serde(default)]
    pub full_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Job category classification.
    #[serde(default)]
    pub category: String,
    /// Technical and professional skills.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Key strengths.
    #[serde(default, alias = "strength")]
    pub strengths: Vec<String>,
}

/// Pulls typed fields out of raw resume text; never fails.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Extract structured fields, falling back to the empty-defaults record on failure.
    async fn extract_fields(&self, text: &str) -> ResumeFields;
}

/// Field extractor backed by the chat completions client.
pub struct LlmFieldExtractor {
    chat: ChatClient,
}

impl LlmFieldExtractor {
    /// Wrap a chat client for field extraction.
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl FieldExtractor for LlmFieldExtractor {
    async fn extract_fields(&self, text: &str) -> ResumeFields {
        let user_content = format!("Resume text: {text}");
        let content = match self.chat.complete(EXTRACT_PROMPT, &user_content, true).await {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(error = %error, "Field extraction failed; using empty defaults");
                return ResumeFields::default();
            }
        };

        match serde_json::from_str(strip_code_fence(&content)) {
            Ok(fields) => fields,
            Err(error) => {
                tracing::warn!(error = %error, "Field extraction returned unparseable JSON; using empty defaults");
                ResumeFields::default()
            }
        }
    }
}

/// Tolerate providers that wrap JSON output in a markdown code fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
