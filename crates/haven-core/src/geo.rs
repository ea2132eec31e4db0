//! Geospatial point types and the WKT codec used at the storage boundary.
//!
//! PostGIS stores location points in its binary geography encoding. Every
//! read path asks the database for a textual rendering (`ST_AsText`, which
//! yields `POINT(lng lat)`) and decodes it here into [`Coordinates`].

use serde::{Deserialize, Serialize};

use crate::defaults::{KM_PER_DEGREE, SEARCH_RADIUS_KM};
use crate::error::{Error, Result};

/// A numeric (longitude, latitude) pair in WGS 84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    /// Marker for an address that could not be resolved.
    ///
    /// Never a valid geocoding result; only produced by degradation.
    pub const SENTINEL: Coordinates = Coordinates {
        longitude: 0.0,
        latitude: 0.0,
    };

    /// Create coordinates, rejecting non-finite or out-of-range values.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(Error::InvalidInput(format!(
                "coordinates must be finite numbers, got ({longitude}, {latitude})"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidInput(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidInput(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Whether these coordinates are the unresolved-address marker.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

/// Render coordinates as a WKT point: `POINT(lng lat)`.
pub fn encode_wkt_point(coords: &Coordinates) -> String {
    format!("POINT({} {})", coords.longitude, coords.latitude)
}

/// Decode a WKT point produced by `ST_AsText`.
///
/// Accepts `POINT(lng lat)`, `POINT (lng lat)` and an EWKT `SRID=n;` prefix.
pub fn decode_wkt_point(wkt: &str) -> Result<Coordinates> {
    let text = wkt.trim();
    let text = match text.split_once(';') {
        Some((srid, rest)) if srid.trim().to_ascii_uppercase().starts_with("SRID=") => rest.trim(),
        _ => text,
    };

    let invalid = || Error::Serialization(format!("invalid WKT point: {wkt:?}"));

    let upper = text.to_ascii_uppercase();
    if !upper.starts_with("POINT") {
        return Err(invalid());
    }
    let body = text[5..].trim();
    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let mut parts = inner.split_whitespace();
    let longitude: f64 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let latitude: f64 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    if parts.next().is_some() || !longitude.is_finite() || !latitude.is_finite() {
        return Err(invalid());
    }

    Ok(Coordinates {
        longitude,
        latitude,
    })
}

/// Convert a ground radius in kilometers to an angular radius in degrees.
///
/// Linear approximation (`km / 111`), kept for compatibility with existing
/// result sets. It overstates east-west coverage away from the equator.
pub fn radius_to_degrees(radius_km: f64) -> f64 {
    radius_km / KM_PER_DEGREE
}

/// Angular radius of the fixed-size search circle.
pub fn search_radius_degrees() -> f64 {
    radius_to_degrees(SEARCH_RADIUS_KM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_origin() {
        assert_eq!(Coordinates::SENTINEL.longitude, 0.0);
        assert_eq!(Coordinates::SENTINEL.latitude, 0.0);
        assert!(Coordinates::SENTINEL.is_sentinel());
    }

    #[test]
    fn test_new_rejects_nan() {
        assert!(Coordinates::new(f64::NAN, 10.0).is_err());
        assert!(Coordinates::new(10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Coordinates::new(181.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -90.5).is_err());
        assert!(Coordinates::new(-180.0, 90.0).is_ok());
    }

    #[test]
    fn test_decode_postgis_output() {
        let coords = decode_wkt_point("POINT(-122.4194 37.7749)").unwrap();
        assert_eq!(coords.longitude, -122.4194);
        assert_eq!(coords.latitude, 37.7749);
    }

    #[test]
    fn test_decode_with_space_and_srid() {
        let coords = decode_wkt_point("SRID=4326;POINT (2.35 48.85)").unwrap();
        assert_eq!(coords.longitude, 2.35);
        assert_eq!(coords.latitude, 48.85);
    }

    #[test]
    fn test_decode_sentinel_point() {
        let coords = decode_wkt_point("POINT(0 0)").unwrap();
        assert!(coords.is_sentinel());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode_wkt_point("").is_err());
        assert!(decode_wkt_point("LINESTRING(0 0, 1 1)").is_err());
        assert!(decode_wkt_point("POINT(1)").is_err());
        assert!(decode_wkt_point("POINT(1 2 3)").is_err());
        assert!(decode_wkt_point("POINT(a b)").is_err());
        assert!(decode_wkt_point("POINT 1 2").is_err());
    }

    #[test]
    fn test_encode_matches_decode_format() {
        let coords = Coordinates::new(-73.9857, 40.7484).unwrap();
        assert_eq!(encode_wkt_point(&coords), "POINT(-73.9857 40.7484)");
    }

    #[test]
    fn test_search_radius_degrees() {
        let degrees = search_radius_degrees();
        assert!((degrees - 9.009).abs() < 0.001);
        assert!(8.0 < degrees && degrees < 10.0);
    }
}
