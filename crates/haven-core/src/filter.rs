//! Sparse listing search filter.
//!
//! Search requests arrive as independently-optional query fields
//! ([`SearchParams`]). They are validated once into a typed
//! [`SearchFilter`]; from then on every present field is a well-formed
//! value and compiling it into SQL cannot fail.
//!
//! A field that is absent, empty, or the literal `any` does not constrain
//! the search.
//!
//! # Example
//!
//! ```
//! use haven_core::{SearchFilter, SearchParams};
//!
//! let params = SearchParams {
//!     price_min: Some("1200".to_string()),
//!     beds: Some("any".to_string()),
//!     amenities: Some("wifi,parking".to_string()),
//!     ..Default::default()
//! };
//!
//! let filter = SearchFilter::from_params(&params).unwrap();
//! assert_eq!(filter.price_min, Some(1200.0));
//! assert_eq!(filter.beds, None);
//! assert_eq!(filter.amenities, Some(vec!["wifi".to_string(), "parking".to_string()]));
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::models::PropertyType;

/// Value meaning "do not filter on this dimension".
pub const ANY: &str = "any";

/// Raw search query fields, exactly as received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub favorite_ids: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub square_feet_min: Option<String>,
    pub square_feet_max: Option<String>,
    pub property_type: Option<String>,
    pub amenities: Option<String>,
    pub available_from: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Center of a radius search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCenter {
    pub latitude: f64,
    pub longitude: f64,
}

/// Validated, typed search filter.
///
/// Field order is the order in which predicates are emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Restrict to these property ids (favorites).
    pub favorite_ids: Option<Vec<i32>>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Minimum number of bedrooms.
    pub beds: Option<i32>,
    /// Minimum number of bathrooms.
    pub baths: Option<f64>,
    pub square_feet_min: Option<i32>,
    pub square_feet_max: Option<i32>,
    pub property_type: Option<PropertyType>,
    /// Required amenities; a row matches when it has all of them.
    pub amenities: Option<Vec<String>>,
    /// Matches properties with a lease starting on or before this instant.
    pub available_from: Option<DateTime<Utc>>,
    pub center: Option<GeoCenter>,
}

impl SearchFilter {
    /// Create an empty filter (matches every listing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw query fields into a typed filter.
    ///
    /// Malformed values are rejected with [`Error::InvalidInput`] naming the
    /// offending field, instead of silently becoming `NaN` bounds.
    pub fn from_params(params: &SearchParams) -> Result<Self> {
        let favorite_ids = present(&params.favorite_ids)
            .map(|raw| parse_list::<i32>("favoriteIds", raw))
            .transpose()?;

        let center = match (present(&params.latitude), present(&params.longitude)) {
            (Some(lat), Some(lng)) => {
                let latitude = parse_finite("latitude", lat)?;
                let longitude = parse_finite("longitude", lng)?;
                let coords = Coordinates::new(longitude, latitude)?;
                Some(GeoCenter {
                    latitude: coords.latitude,
                    longitude: coords.longitude,
                })
            }
            (None, None) => None,
            _ => {
                return Err(Error::InvalidInput(
                    "latitude and longitude must be supplied together".to_string(),
                ))
            }
        };

        Ok(Self {
            favorite_ids,
            price_min: present(&params.price_min)
                .map(|v| parse_finite("priceMin", v))
                .transpose()?,
            price_max: present(&params.price_max)
                .map(|v| parse_finite("priceMax", v))
                .transpose()?,
            beds: present(&params.beds)
                .map(|v| parse_value("beds", v))
                .transpose()?,
            baths: present(&params.baths)
                .map(|v| parse_finite("baths", v))
                .transpose()?,
            square_feet_min: present(&params.square_feet_min)
                .map(|v| parse_value("squareFeetMin", v))
                .transpose()?,
            square_feet_max: present(&params.square_feet_max)
                .map(|v| parse_value("squareFeetMax", v))
                .transpose()?,
            property_type: present(&params.property_type)
                .map(PropertyType::from_str)
                .transpose()?,
            amenities: present(&params.amenities).map(split_list),
            available_from: present(&params.available_from)
                .map(|v| parse_date("availableFrom", v))
                .transpose()?,
            center,
        })
    }

    /// Whether no dimension constrains the search.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Return the trimmed value unless it is absent, blank, or `any`.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ANY)
}

fn parse_value<T: FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| Error::InvalidInput(format!("{field} must be a whole number, got '{raw}'")))
}

fn parse_finite(field: &str, raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidInput(format!(
            "{field} must be a finite number, got '{raw}'"
        ))),
    }
}

fn parse_list<T: FromStr>(field: &str, raw: &str) -> Result<Vec<T>> {
    split_list(raw)
        .iter()
        .map(|item| parse_value(field, item))
        .collect()
}

/// Split a comma-separated list, dropping blank entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_date(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "{field} must be a date (YYYY-MM-DD) or RFC 3339 timestamp, got '{raw}'"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn test_empty_params_give_empty_filter() {
        let filter = SearchFilter::from_params(&params()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_any_and_blank_are_absent() {
        let p = SearchParams {
            favorite_ids: Some("".to_string()),
            price_min: Some("any".to_string()),
            price_max: Some("  ".to_string()),
            beds: Some("any".to_string()),
            baths: Some(" any ".to_string()),
            square_feet_min: Some("any".to_string()),
            square_feet_max: Some("any".to_string()),
            property_type: Some("any".to_string()),
            amenities: Some("any".to_string()),
            available_from: Some("any".to_string()),
            latitude: Some("any".to_string()),
            longitude: Some("any".to_string()),
        };
        assert!(SearchFilter::from_params(&p).unwrap().is_empty());
    }

    #[test]
    fn test_any_sentinel_is_case_sensitive() {
        let p = SearchParams {
            amenities: Some("ANY".to_string()),
            ..params()
        };
        let f = SearchFilter::from_params(&p).unwrap();
        assert_eq!(f.amenities, Some(vec!["ANY".to_string()]));

        let p = SearchParams {
            beds: Some("Any".to_string()),
            ..params()
        };
        assert!(matches!(
            SearchFilter::from_params(&p),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_numeric_fields_parse() {
        let p = SearchParams {
            price_min: Some("1000".to_string()),
            price_max: Some("2500.50".to_string()),
            beds: Some("2".to_string()),
            baths: Some("1.5".to_string()),
            square_feet_min: Some("600".to_string()),
            square_feet_max: Some("1200".to_string()),
            ..params()
        };
        let f = SearchFilter::from_params(&p).unwrap();
        assert_eq!(f.price_min, Some(1000.0));
        assert_eq!(f.price_max, Some(2500.5));
        assert_eq!(f.beds, Some(2));
        assert_eq!(f.baths, Some(1.5));
        assert_eq!(f.square_feet_min, Some(600));
        assert_eq!(f.square_feet_max, Some(1200));
    }

    #[test]
    fn test_non_numeric_price_is_rejected_not_nan() {
        let p = SearchParams {
            price_min: Some("cheap".to_string()),
            ..params()
        };
        let err = SearchFilter::from_params(&p).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("priceMin"));
    }

    #[test]
    fn test_nan_literal_is_rejected() {
        let p = SearchParams {
            baths: Some("NaN".to_string()),
            ..params()
        };
        assert!(SearchFilter::from_params(&p).is_err());

        let p = SearchParams {
            price_max: Some("inf".to_string()),
            ..params()
        };
        assert!(SearchFilter::from_params(&p).is_err());
    }

    #[test]
    fn test_fractional_beds_rejected() {
        let p = SearchParams {
            beds: Some("1.5".to_string()),
            ..params()
        };
        assert!(SearchFilter::from_params(&p).is_err());
    }

    #[test]
    fn test_favorite_ids_parse_and_reject() {
        let p = SearchParams {
            favorite_ids: Some("3, 7,11".to_string()),
            ..params()
        };
        let f = SearchFilter::from_params(&p).unwrap();
        assert_eq!(f.favorite_ids, Some(vec![3, 7, 11]));

        let p = SearchParams {
            favorite_ids: Some("3,abc".to_string()),
            ..params()
        };
        assert!(SearchFilter::from_params(&p).is_err());
    }

    #[test]
    fn test_property_type_closed_enumeration() {
        let p = SearchParams {
            property_type: Some("Villa".to_string()),
            ..params()
        };
        let f = SearchFilter::from_params(&p).unwrap();
        assert_eq!(f.property_type, Some(PropertyType::Villa));

        let p = SearchParams {
            property_type: Some("Villa'; DROP TABLE property; --".to_string()),
            ..params()
        };
        assert!(SearchFilter::from_params(&p).is_err());
    }

    #[test]
    fn test_amenities_split() {
        let p = SearchParams {
            amenities: Some("wifi, parking,,".to_string()),
            ..params()
        };
        let f = SearchFilter::from_params(&p).unwrap();
        assert_eq!(
            f.amenities,
            Some(vec!["wifi".to_string(), "parking".to_string()])
        );
    }

    #[test]
    fn test_available_from_date_formats() {
        let p = SearchParams {
            available_from: Some("2026-11-01".to_string()),
            ..params()
        };
        let f = SearchFilter::from_params(&p).unwrap();
        assert_eq!(
            f.available_from,
            Some(Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap())
        );

        let p = SearchParams {
            available_from: Some("2026-11-01T12:30:00+02:00".to_string()),
            ..params()
        };
        let f = SearchFilter::from_params(&p).unwrap();
        assert_eq!(
            f.available_from,
            Some(Utc.with_ymd_and_hms(2026, 11, 1, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_date_rejected() {
        let p = SearchParams {
            available_from: Some("next tuesday".to_string()),
            ..params()
        };
        assert!(SearchFilter::from_params(&p).is_err());
    }

    #[test]
    fn test_center_requires_both_coordinates() {
        let p = SearchParams {
            latitude: Some("40.7".to_string()),
            ..params()
        };
        assert!(SearchFilter::from_params(&p).is_err());

        let p = SearchParams {
            latitude: Some("40.7".to_string()),
            longitude: Some("-74.0".to_string()),
            ..params()
        };
        let f = SearchFilter::from_params(&p).unwrap();
        assert_eq!(
            f.center,
            Some(GeoCenter {
                latitude: 40.7,
                longitude: -74.0
            })
        );
    }

    #[test]
    fn test_center_out_of_range_rejected() {
        let p = SearchParams {
            latitude: Some("95".to_string()),
            longitude: Some("0".to_string()),
            ..params()
        };
        assert!(SearchFilter::from_params(&p).is_err());
    }

    #[test]
    fn test_params_deserialize_camel_case() {
        let p: SearchParams = serde_json::from_value(serde_json::json!({
            "priceMin": "100",
            "squareFeetMax": "900",
            "favoriteIds": "1,2"
        }))
        .unwrap();
        assert_eq!(p.price_min.as_deref(), Some("100"));
        assert_eq!(p.square_feet_max.as_deref(), Some("900"));
        assert_eq!(p.favorite_ids.as_deref(), Some("1,2"));
    }
}
