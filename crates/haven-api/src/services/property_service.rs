//! Listing search and the creation pipeline.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use haven_core::{
    AddressFields, Geocoder, MediaBlob, NewProperty, Property, PropertyDetails,
    PropertyRepository, Result, SearchFilter,
};

use super::media::MediaIngestor;

/// Input to [`PropertyService::create`].
#[derive(Debug, Clone)]
pub struct CreatePropertyRequest {
    pub address: AddressFields,
    pub details: PropertyDetails,
    pub photos: Vec<MediaBlob>,
    pub manager_cognito_id: String,
}

/// Created listing plus which photo slots hold placeholders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProperty {
    #[serde(flatten)]
    pub property: Property,
    pub placeholder_photo_indices: Vec<usize>,
}

/// Coordinates geocoding, photo ingestion and persistence.
#[derive(Clone)]
pub struct PropertyService {
    repository: Arc<dyn PropertyRepository>,
    geocoder: Arc<dyn Geocoder>,
    media: MediaIngestor,
}

impl PropertyService {
    pub fn new(
        repository: Arc<dyn PropertyRepository>,
        geocoder: Arc<dyn Geocoder>,
        media: MediaIngestor,
    ) -> Self {
        Self {
            repository,
            geocoder,
            media,
        }
    }

    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<Property>> {
        self.repository.search(filter).await
    }

    pub async fn fetch(&self, id: i32) -> Result<Property> {
        self.repository.fetch(id).await
    }

    /// Resolve the address, ingest photos, then write both rows atomically.
    ///
    /// Geocoding and photo failures degrade to sentinel coordinates and
    /// placeholders; only persistence failures are returned as errors.
    pub async fn create(&self, request: CreatePropertyRequest) -> Result<CreatedProperty> {
        let start = Instant::now();
        let CreatePropertyRequest {
            address,
            details,
            photos,
            manager_cognito_id,
        } = request;

        let coordinates = self.geocoder.resolve(&address).await;

        let outcomes = self.media.ingest_detailed(photos, &details.name).await;
        let placeholder_photo_indices: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_placeholder())
            .map(|(i, _)| i)
            .collect();
        let photo_urls = outcomes.into_iter().map(|o| o.into_url()).collect();

        let property = self
            .repository
            .create(NewProperty {
                address,
                coordinates,
                photo_urls,
                details,
                manager_cognito_id,
            })
            .await?;

        info!(
            subsystem = "api",
            component = "property_service",
            op = "create",
            property_id = property.id,
            location_id = property.location_id,
            degraded = coordinates.is_sentinel(),
            placeholder_count = placeholder_photo_indices.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Property listing created"
        );

        Ok(CreatedProperty {
            property,
            placeholder_photo_indices,
        })
    }
}
