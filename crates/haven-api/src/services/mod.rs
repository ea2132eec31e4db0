//! Service layer for business logic.

pub mod geocoding;
pub mod media;
pub mod object_storage;
pub mod property_service;

pub use geocoding::NominatimGeocoder;
pub use media::MediaIngestor;
pub use object_storage::BucketStorage;
pub use property_service::{CreatePropertyRequest, CreatedProperty, PropertyService};
