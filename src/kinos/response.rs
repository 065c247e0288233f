//! Response normalization.
//!
//! The two producing endpoints disagree on the reply field name: `messages`
//! replies under `content` and `analysis` under `response`, and neither is
//! guaranteed. Callers must probe `response` first, then `content`, treating
//! the first non-empty value as authoritative. This precedence is an upstream
//! inconsistency to preserve, not to fix.

use serde_json::Value;

/// Extract the best-effort reply text from an inbound mapping.
pub fn reply_text(result: &Value) -> Option<String> {
    for key in ["response", "content"] {
        if let Some(text) = result.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Optional metadata accessor for the common `status`/`id` fields.
pub fn metadata_str<'a>(result: &'a Value, key: &str) -> Option<&'a str> {
    result.get(key).and_then(Value::as_str)
}

/// View over an image-generation response.
pub struct ImageResult<'a> {
    raw: &'a Value,
}

impl<'a> ImageResult<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    /// HTTP URL of the generated image, under `data.url`.
    pub fn url(&self) -> Option<&str> {
        self.raw.get("data").and_then(|d| d.get("url")).and_then(Value::as_str)
    }

    /// Server-side filesystem path, when reported.
    pub fn local_path(&self) -> Option<&str> {
        self.raw.get("local_path").and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        metadata_str(self.raw, "id")
    }

    pub fn status(&self) -> Option<&str> {
        metadata_str(self.raw, "status")
    }

    pub fn prompt(&self) -> Option<&str> {
        metadata_str(self.raw, "prompt")
    }

    pub fn created_at(&self) -> Option<&str> {
        metadata_str(self.raw, "created_at")
    }
}
