//! # haven-core
//!
//! Core types, traits, and abstractions for the haven listings backend.
//!
//! This crate provides the domain model (locations, properties, search
//! filters), the geospatial point codec, and the trait seams that the
//! database and API crates implement.

pub mod defaults;
pub mod error;
pub mod filter;
pub mod geo;
pub mod logging;
pub mod media;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use filter::{split_list, GeoCenter, SearchFilter, SearchParams};
pub use geo::{
    decode_wkt_point, encode_wkt_point, radius_to_degrees, search_radius_degrees, Coordinates,
};
pub use media::{placeholder_url, MediaBlob, MediaOutcome};
pub use models::*;
pub use traits::*;
