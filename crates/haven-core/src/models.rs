//! Domain models for rental listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::geo::Coordinates;

// =============================================================================
// PROPERTY TYPE
// =============================================================================

/// Property category, mirrored by the `property_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PropertyType {
    Rooms,
    Tinyhouse,
    #[default]
    Apartment,
    Villa,
    Townhouse,
    Cottage,
}

impl PropertyType {
    /// All categories, in enum declaration order.
    pub const ALL: [PropertyType; 6] = [
        PropertyType::Rooms,
        PropertyType::Tinyhouse,
        PropertyType::Apartment,
        PropertyType::Villa,
        PropertyType::Townhouse,
        PropertyType::Cottage,
    ];

    /// Database label of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Rooms => "Rooms",
            PropertyType::Tinyhouse => "Tinyhouse",
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Cottage => "Cottage",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown property type '{}'; expected one of: {}",
                    trimmed,
                    PropertyType::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

// =============================================================================
// LOCATION
// =============================================================================

/// Free-form postal address fields supplied on property creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl AddressFields {
    /// Single-line query text used for geocoding.
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            self.address, self.city, self.state, self.country, self.postal_code
        )
    }
}

/// A stored location with decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i32,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub coordinates: Coordinates,
}

// =============================================================================
// PROPERTY
// =============================================================================

/// Typed scalar attributes of a property, as accepted on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    pub beds: i32,
    pub baths: f64,
    pub square_feet: i32,
    pub is_pets_allowed: bool,
    pub is_parking_included: bool,
    pub property_type: PropertyType,
    pub amenities: Vec<String>,
    pub highlights: Vec<String>,
}

/// A stored property joined with its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    pub photo_urls: Vec<String>,
    pub amenities: Vec<String>,
    pub highlights: Vec<String>,
    pub is_pets_allowed: bool,
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: f64,
    pub square_feet: i32,
    pub property_type: PropertyType,
    pub posted_date: DateTime<Utc>,
    pub average_rating: Option<f64>,
    pub number_of_reviews: Option<i32>,
    pub location_id: i32,
    pub manager_cognito_id: String,
    pub location: Location,
}

/// Everything the creation transaction needs to write one listing.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub address: AddressFields,
    pub coordinates: Coordinates,
    pub photo_urls: Vec<String>,
    pub details: PropertyDetails,
    pub manager_cognito_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_parse_case_insensitive() {
        assert_eq!("villa".parse::<PropertyType>().unwrap(), PropertyType::Villa);
        assert_eq!(
            " Townhouse ".parse::<PropertyType>().unwrap(),
            PropertyType::Townhouse
        );
    }

    #[test]
    fn test_property_type_rejects_unknown() {
        let err = "Castle".parse::<PropertyType>().unwrap_err();
        assert!(err.to_string().contains("Castle"));
        assert!(err.to_string().contains("Apartment"));
    }

    #[test]
    fn test_property_type_default_is_apartment() {
        assert_eq!(PropertyType::default(), PropertyType::Apartment);
    }

    #[test]
    fn test_property_type_labels_roundtrip() {
        for t in PropertyType::ALL {
            assert_eq!(t.as_str().parse::<PropertyType>().unwrap(), t);
        }
    }

    #[test]
    fn test_full_address_joins_fields() {
        let addr = AddressFields {
            address: "1 Ocean Dr".to_string(),
            city: "Miami".to_string(),
            state: "FL".to_string(),
            country: "USA".to_string(),
            postal_code: "33139".to_string(),
        };
        assert_eq!(addr.full_address(), "1 Ocean Dr, Miami, FL, USA, 33139");
    }

    #[test]
    fn test_location_serializes_camel_case() {
        let loc = Location {
            id: 7,
            address: "1 Ocean Dr".to_string(),
            city: "Miami".to_string(),
            state: "FL".to_string(),
            country: "USA".to_string(),
            postal_code: "33139".to_string(),
            coordinates: Coordinates::SENTINEL,
        };
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["postalCode"], "33139");
        assert_eq!(json["coordinates"]["longitude"], 0.0);
        assert_eq!(json["coordinates"]["latitude"], 0.0);
    }
}
