//! Filter helpers for Qdrant queries scoped to one resume.

use serde_json::{Value, json};

/// Compose the payload filter matching every point owned by a resume id.
pub fn build_resume_filter(resume_id: &str) -> Value {
    json!({
        "must": [
            {
                "key": "resume_id",
                "match": { "value": resume_id }
            }
        ]
    })
}
