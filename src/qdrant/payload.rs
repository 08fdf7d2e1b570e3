//! Helpers for constructing chunk payloads and point identifiers.

use crate::qdrant::types::ResumeMetadata;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

/// Maximum number of characters of chunk text stored in the payload preview.
pub const CHUNK_PREVIEW_CHARS: usize = 500;

/// Payload keys owned by the indexer; caller metadata may never override them.
const RESERVED_KEYS: [&str; 5] = [
    "resume_id",
    "chunk_index",
    "chunk_text",
    "chunk_length",
    "indexed_at",
];

/// Build the payload object stored alongside one indexed chunk.
///
/// Reserved keys describe the chunk itself; the caller metadata is merged afterwards and
/// loses on any key conflict.
pub fn build_chunk_payload(
    resume_id: &str,
    chunk_index: usize,
    chunk: &str,
    metadata: &ResumeMetadata,
) -> Value {
    let mut payload = Map::new();
    payload.insert("resume_id".into(), Value::String(resume_id.to_string()));
    payload.insert("chunk_index".into(), Value::from(chunk_index));
    payload.insert(
        "chunk_text".into(),
        Value::String(chunk.chars().take(CHUNK_PREVIEW_CHARS).collect()),
    );
    payload.insert("chunk_length".into(), Value::from(chunk.chars().count()));
    payload.insert(
        "indexed_at".into(),
        Value::String(current_timestamp_rfc3339()),
    );

    if let Some(fullname) = metadata.fullname.as_ref().filter(|value| !value.is_empty()) {
        payload.insert("fullname".into(), Value::String(fullname.clone()));
    }
    if let Some(email) = metadata.email.as_ref().filter(|value| !value.is_empty()) {
        payload.insert("email".into(), Value::String(email.clone()));
    }
    if let Some(category) = metadata.category.as_ref().filter(|value| !value.is_empty()) {
        payload.insert("category".into(), Value::String(category.clone()));
    }
    if let Some(skills) = metadata.skills.as_ref().filter(|skills| !skills.is_empty()) {
        payload.insert(
            "skills".into(),
            Value::Array(
                skills
                    .iter()
                    .map(|skill| Value::String(skill.clone()))
                    .collect(),
            ),
        );
    }
    if let Some(file_name) = metadata
        .file_name
        .as_ref()
        .filter(|value| !value.is_empty())
    {
        payload.insert("file_name".into(), Value::String(file_name.clone()));
    }

    for (key, value) in &metadata.extra {
        if RESERVED_KEYS.contains(&key.as_str()) {
            tracing::debug!(key, "Dropping metadata entry shadowing a reserved payload key");
            continue;
        }
        payload.entry(key.clone()).or_insert_with(|| value.clone());
    }

    Value::Object(payload)
}

/// Current timestamp formatted for payload storage.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Construct a fresh opaque identifier for a vector point.
pub(crate) fn generate_point_id() -> String {
    Uuid::new_v4().to_string()
}
