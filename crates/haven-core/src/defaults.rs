//! Centralized default constants for haven.
//!
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// GEOSPATIAL SEARCH
// =============================================================================

/// Fixed search radius around a requested center, in kilometers.
pub const SEARCH_RADIUS_KM: f64 = 1000.0;

/// Kilometers per degree used by the linear radius approximation.
///
/// Only holds near the equator; the angular radius it produces covers a
/// progressively smaller ground distance east-west towards the poles.
pub const KM_PER_DEGREE: f64 = 111.0;

/// SRID of stored location points (WGS 84).
pub const POINT_SRID: i32 = 4326;

// =============================================================================
// GEOCODING
// =============================================================================

/// Default geocoding search endpoint (Nominatim / OpenStreetMap).
pub const GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Client identity sent on every geocoding request (required by the
/// Nominatim usage policy).
pub const GEOCODER_USER_AGENT: &str = "RealEstateApp/1.0";

/// Deadline for a single geocoding lookup, in seconds.
pub const GEOCODER_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// MEDIA
// =============================================================================

/// Base of deterministic placeholder photo URLs.
pub const PLACEHOLDER_IMAGE_BASE: &str = "https://via.placeholder.com/800x600";

/// Bucket name shipped in sample configuration; treated as "unconfigured".
pub const PLACEHOLDER_BUCKET_SENTINEL: &str = "your-s3-bucket-name";

/// Key prefix for uploaded property photos.
pub const PHOTO_KEY_PREFIX: &str = "properties";

/// Default object storage region.
pub const S3_REGION: &str = "us-east-1";

/// Default maximum multipart request size (50 MiB).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3002;

/// Environment name that suppresses stack traces in error bodies.
pub const PRODUCTION_ENV: &str = "production";
