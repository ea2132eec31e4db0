//! Core traits for haven abstractions.
//!
//! These traits define the seams between the creation/search pipeline and
//! its collaborators (database, geocoding service, object storage), so each
//! can be swapped for a test double.

use async_trait::async_trait;

use crate::error::Result;
use crate::filter::SearchFilter;
use crate::geo::Coordinates;
use crate::media::MediaBlob;
use crate::models::{AddressFields, NewProperty, Property};

/// Repository for listing reads and the two-row create.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Return every property matching all constraints of `filter`.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Property>>;

    /// Fetch one property with its location.
    async fn fetch(&self, id: i32) -> Result<Property>;

    /// Insert the location and property rows as one atomic unit.
    async fn create(&self, new: NewProperty) -> Result<Property>;
}

/// Address-to-coordinates lookup.
///
/// Infallible by contract: any failure resolves to
/// [`Coordinates::SENTINEL`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &AddressFields) -> Coordinates;
}

/// Object storage that returns a public URL for each stored object.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `blob` under `key` and return its public URL.
    async fn put(&self, key: &str, blob: &MediaBlob) -> Result<String>;
}
