//! Concurrent photo ingestion with per-item placeholder fallback.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, trace, warn};

use haven_core::defaults::PHOTO_KEY_PREFIX;
use haven_core::{placeholder_url, MediaBlob, MediaOutcome, ObjectStorage};

/// Uploads property photos and substitutes placeholders for failures.
///
/// Output always has one entry per input blob, in input order. An empty
/// input, or a missing storage backend, still yields usable URLs.
#[derive(Clone)]
pub struct MediaIngestor {
    storage: Option<Arc<dyn ObjectStorage>>,
}

impl MediaIngestor {
    pub fn new(storage: Option<Arc<dyn ObjectStorage>>) -> Self {
        Self { storage }
    }

    /// Ingestor that never uploads.
    pub fn placeholders_only() -> Self {
        Self { storage: None }
    }

    /// Ingest `blobs`, returning one outcome per blob.
    ///
    /// Uploads run concurrently; a failed upload only affects its own slot.
    /// With no blobs the result is the single placeholder for index 0.
    pub async fn ingest_detailed(
        &self,
        blobs: Vec<MediaBlob>,
        display_name: &str,
    ) -> Vec<MediaOutcome> {
        if blobs.is_empty() {
            return vec![MediaOutcome::Placeholder(placeholder_url(display_name, 0))];
        }

        let Some(storage) = &self.storage else {
            debug!(
                subsystem = "media",
                component = "ingestor",
                op = "ingest",
                media_count = blobs.len(),
                "No object storage configured, using placeholders"
            );
            return (0..blobs.len())
                .map(|i| MediaOutcome::Placeholder(placeholder_url(display_name, i)))
                .collect();
        };

        // Index keeps keys distinct when clients reuse a file name.
        let batch = Utc::now().timestamp_millis();
        let tasks = blobs.into_iter().enumerate().map(|(index, blob)| {
            let storage = Arc::clone(storage);
            let key = photo_key(batch, index, &blob.file_name);
            tokio::spawn(async move { storage.put(&key, &blob).await })
        });

        let results = join_all(tasks).await;

        let outcomes: Vec<MediaOutcome> = results
            .into_iter()
            .enumerate()
            .map(|(index, joined)| match joined {
                Ok(Ok(url)) => {
                    trace!(subsystem = "media", index, url = %url, "Photo uploaded");
                    MediaOutcome::Uploaded(url)
                }
                Ok(Err(e)) => {
                    warn!(
                        subsystem = "media",
                        component = "ingestor",
                        index,
                        degraded = true,
                        error = %e,
                        "Photo upload failed, substituting placeholder"
                    );
                    MediaOutcome::Placeholder(placeholder_url(display_name, index))
                }
                Err(e) => {
                    warn!(
                        subsystem = "media",
                        component = "ingestor",
                        index,
                        degraded = true,
                        error = %e,
                        "Photo upload task aborted, substituting placeholder"
                    );
                    MediaOutcome::Placeholder(placeholder_url(display_name, index))
                }
            })
            .collect();

        debug!(
            subsystem = "media",
            component = "ingestor",
            op = "ingest",
            media_count = outcomes.len(),
            placeholder_count = outcomes.iter().filter(|o| o.is_placeholder()).count(),
            "Photo ingestion complete"
        );
        outcomes
    }

    /// Ingest `blobs`, returning only the URLs.
    pub async fn ingest(&self, blobs: Vec<MediaBlob>, display_name: &str) -> Vec<String> {
        self.ingest_detailed(blobs, display_name)
            .await
            .into_iter()
            .map(MediaOutcome::into_url)
            .collect()
    }
}

/// Object key for the `index`-th photo of an upload batch.
pub fn photo_key(batch: i64, index: usize, file_name: &str) -> String {
    format!("{}/{}-{}-{}", PHOTO_KEY_PREFIX, batch, index, file_name)
}
