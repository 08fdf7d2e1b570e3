//! Total chunking with graceful degradation.
//!
//! Splitting prefers semantic boundaries via `semchunk` with a `tiktoken` token counter.
//! When the tokenizer cannot be built, or semantic splitting yields nothing usable, the
//! splitter falls back to fixed character windows (500 chars with a 50-char overlap),
//! and finally to returning the whole input as a single chunk. The function never
//! returns an error; empty or whitespace-only input yields an empty sequence.

use anyhow::Error as TokenizerError;
use semchunk_rs::Chunker;
use std::sync::Arc;
use thiserror::Error;
use tiktoken_rs::cl100k_base;

type TokenCounter = Arc<dyn Fn(&str) -> usize + Send + Sync>;

/// Token budget used for semantic chunking when no override is configured.
pub(crate) const DEFAULT_TOKEN_BUDGET: usize = 256;
/// Window size, in characters, for the fixed-window fallback.
pub(crate) const FALLBACK_WINDOW_CHARS: usize = 500;
/// Overlap, in characters, between consecutive fallback windows.
pub(crate) const FALLBACK_OVERLAP_CHARS: usize = 50;

/// Errors produced while attempting semantic chunking. Internal only: callers of
/// [`chunk_resume_text`] always receive a chunk sequence.
#[derive(Debug, Error)]
enum ChunkingError {
    #[error("chunk token budget must be greater than zero")]
    InvalidTokenBudget,
    #[error("failed to initialize tokenizer: {0}")]
    Tokenizer(TokenizerError),
}

/// Split resume text into an ordered sequence of bounded chunks.
///
/// Degrades through three tiers (semantic, fixed windows, single chunk) and never fails.
pub fn chunk_resume_text(text: &str, token_budget: Option<usize>) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let budget = token_budget.unwrap_or(DEFAULT_TOKEN_BUDGET);
    match semantic_chunks(text, budget) {
        Ok(chunks) if !chunks.is_empty() => return chunks,
        Ok(_) => {
            tracing::debug!("Semantic chunking produced no chunks; using character windows");
        }
        Err(error) => {
            tracing::warn!(error = %error, "Semantic chunking unavailable; using character windows");
        }
    }

    let windows = window_chunks(text, FALLBACK_WINDOW_CHARS, FALLBACK_OVERLAP_CHARS);
    if windows.is_empty() {
        return vec![text.to_string()];
    }
    windows
}

fn semantic_chunks(text: &str, token_budget: usize) -> Result<Vec<String>, ChunkingError> {
    if token_budget == 0 {
        return Err(ChunkingError::InvalidTokenBudget);
    }

    let counter = build_token_counter()?;
    let chunker = Chunker::new(
        token_budget,
        Box::new(move |segment: &str| counter.as_ref()(segment)),
    );
    Ok(chunker
        .chunk(text)
        .into_iter()
        .filter(|chunk| !chunk.trim().is_empty())
        .collect())
}

fn build_token_counter() -> Result<TokenCounter, ChunkingError> {
    let encoding = cl100k_base().map_err(ChunkingError::Tokenizer)?;
    let encoding = Arc::new(encoding);
    Ok(Arc::new(move |segment: &str| {
        encoding.encode_ordinary(segment).len()
    }))
}

/// Fixed-size character windows with overlap, skipping windows empty after trimming.
fn window_chunks(text: &str, window: usize, overlap: usize) -> Vec<String> {
    if window == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = window.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + window).min(chars.len());
        let slice: String = chars[start..end].iter().collect();
        let trimmed = slice.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
