//! History domain models.
//!
//! A `HistoryItem` is one visual artifact in the editing session: the
//! original upload, a generated result, or an intermediate edit. Items
//! are owned by the [`Timeline`](super::Timeline) in insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What produced a history item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// User-provided image (file selection or camera capture).
    Upload,
    /// Result of a generation API call.
    Generation,
    /// Manual, non-generative edit.
    Edit,
    /// Deterministic transformation (crop, rotate, etc.).
    Transformation,
}

/// The visual payload of a history item.
///
/// Owned bytes and a reference string are mutually exclusive by tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemContent {
    /// Image data held in memory.
    Bytes {
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
        mime_type: String,
    },
    /// A URL pointing at the image; no bytes in memory.
    Reference(String),
}

impl ItemContent {
    /// Returns the in-memory bytes and MIME type, or `None` for references.
    pub fn bytes(&self) -> Option<(&[u8], &str)> {
        match self {
            ItemContent::Bytes { data, mime_type } => Some((data, mime_type)),
            ItemContent::Reference(_) => None,
        }
    }

    /// Returns the reference URL, or `None` for in-memory content.
    pub fn reference(&self) -> Option<&str> {
        match self {
            ItemContent::Bytes { .. } => None,
            ItemContent::Reference(url) => Some(url),
        }
    }
}

/// A citation returned alongside a generated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingReference {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One visual artifact in the editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Unique identifier (UUID format)
    pub id: String,
    pub content: ItemContent,
    pub kind: ItemKind,
    /// Creation timestamp. Non-decreasing across the sequence in practice,
    /// not enforced.
    pub created_at: DateTime<Utc>,
    /// Prompt that produced this item, when it came from a generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Ordered citations, present only for generation items that cite
    /// external sources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding: Vec<GroundingReference>,
}

impl HistoryItem {
    /// Creates an upload item from in-memory image bytes.
    pub fn upload(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::new(
            ItemContent::Bytes {
                data,
                mime_type: mime_type.into(),
            },
            ItemKind::Upload,
        )
    }

    /// Creates an upload item referencing an external URL.
    pub fn upload_reference(url: impl Into<String>) -> Self {
        Self::new(ItemContent::Reference(url.into()), ItemKind::Upload)
    }

    /// Creates a generation item with its originating prompt and citations.
    pub fn generation(
        data: Vec<u8>,
        mime_type: impl Into<String>,
        prompt: Option<String>,
        grounding: Vec<GroundingReference>,
    ) -> Self {
        let mut item = Self::new(
            ItemContent::Bytes {
                data,
                mime_type: mime_type.into(),
            },
            ItemKind::Generation,
        );
        item.prompt = prompt;
        item.grounding = grounding;
        item
    }

    fn new(content: ItemContent, kind: ItemKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            kind,
            created_at: Utc::now(),
            prompt: None,
            grounding: Vec::new(),
        }
    }

    /// Returns true if this item is an upload.
    pub fn is_upload(&self) -> bool {
        self.kind == ItemKind::Upload
    }
}

/// Serde codec storing binary image data as standard base64.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
