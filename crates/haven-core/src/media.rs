//! Property photo types and deterministic placeholder URLs.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::defaults::PLACEHOLDER_IMAGE_BASE;

/// One uploaded media attachment, held in memory.
#[derive(Debug, Clone)]
pub struct MediaBlob {
    /// Original client-side file name.
    pub file_name: String,
    /// MIME type declared by the client.
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Result of ingesting a single blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "url", rename_all = "snake_case")]
pub enum MediaOutcome {
    /// Stored in object storage; public URL.
    Uploaded(String),
    /// Storage unavailable or upload failed; deterministic placeholder.
    Placeholder(String),
}

impl MediaOutcome {
    pub fn url(&self) -> &str {
        match self {
            MediaOutcome::Uploaded(url) | MediaOutcome::Placeholder(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            MediaOutcome::Uploaded(url) | MediaOutcome::Placeholder(url) => url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, MediaOutcome::Placeholder(_))
    }
}

/// Placeholder image URL for the `index`-th photo of `display_name`.
///
/// Depends only on its inputs: `{base}?text={urlencoded(name-index)}`.
pub fn placeholder_url(display_name: &str, index: usize) -> String {
    let text = format!("{display_name}-{index}");
    format!(
        "{}?text={}",
        PLACEHOLDER_IMAGE_BASE,
        urlencoding::encode(&text)
    )
}
