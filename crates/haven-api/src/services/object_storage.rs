//! Object storage backend for property photos.

use std::sync::Arc;

use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use tracing::trace;

use haven_core::{Error, MediaBlob, ObjectStorage, Result};

use crate::config::StorageConfig;

/// [`ObjectStorage`] over any `object_store` backend.
///
/// Returned URLs are `{public_base_url}/{location}`, where `location` is the
/// key as `object_store` stored it, percent-encoded per path segment.
pub struct BucketStorage {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl BucketStorage {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public URL of an object stored at `location`.
    pub fn public_url(&self, location: &Path) -> String {
        let segments: Vec<String> = location
            .parts()
            .map(|part| urlencoding::encode(part.as_ref()).into_owned())
            .collect();
        format!("{}/{}", self.public_base_url, segments.join("/"))
    }

    /// S3 bucket from configuration; `None` when no real bucket is configured.
    ///
    /// Credentials come from the standard `AWS_*` environment variables.
    pub fn s3_from_config(config: &StorageConfig) -> Result<Option<Self>> {
        let (Some(bucket), Some(public_base_url)) =
            (config.active_bucket(), config.public_base_url())
        else {
            return Ok(None);
        };

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(config.region.clone())
            .build()
            .map_err(|e| Error::Config(format!("object storage: {}", e)))?;

        Ok(Some(Self::new(Arc::new(store), public_base_url)))
    }
}

#[async_trait]
impl ObjectStorage for BucketStorage {
    async fn put(&self, key: &str, blob: &MediaBlob) -> Result<String> {
        let mut attributes = Attributes::new();
        if let Some(content_type) = &blob.content_type {
            attributes.insert(Attribute::ContentType, content_type.clone().into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        // Path::from escapes characters object stores reject, e.g. '#' -> "%23".
        let location = Path::from(key);
        self.store
            .put_opts(
                &location,
                PutPayload::from(blob.data.clone()),
                options,
            )
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        trace!(
            subsystem = "media",
            component = "object_storage",
            op = "put",
            location = %location,
            size = blob.data.len(),
            "Object stored"
        );

        Ok(self.public_url(&location))
    }
}
