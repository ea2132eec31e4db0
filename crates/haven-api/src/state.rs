//! Shared request state.

use std::sync::Arc;

use haven_core::Result;
use haven_db::Database;

use crate::config::ApiConfig;
use crate::services::{BucketStorage, MediaIngestor, NominatimGeocoder, PropertyService};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub properties: PropertyService,
}

impl AppState {
    pub fn new(db: Database, properties: PropertyService) -> Self {
        Self { db, properties }
    }

    /// Wire the production collaborators around `db`.
    pub fn from_config(db: Database, config: &ApiConfig) -> Result<Self> {
        let geocoder = NominatimGeocoder::new(&config.geocoder)?;

        let media = match BucketStorage::s3_from_config(&config.storage)? {
            Some(storage) => {
                tracing::info!(
                    subsystem = "media",
                    bucket = config.storage.active_bucket().unwrap_or_default(),
                    "Photo uploads enabled"
                );
                MediaIngestor::new(Some(Arc::new(storage)))
            }
            None => {
                tracing::info!(
                    subsystem = "media",
                    "No bucket configured, photos will use placeholders"
                );
                MediaIngestor::placeholders_only()
            }
        };

        let properties = PropertyService::new(
            Arc::new(db.properties.clone()),
            Arc::new(geocoder),
            media,
        );

        Ok(Self::new(db, properties))
    }
}
