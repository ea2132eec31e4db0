//! Multipart create-listing form.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use haven_core::{
    split_list, AddressFields, Error, MediaBlob, PropertyDetails, PropertyType, Result,
};

/// Multipart part name carrying photo files.
pub const PHOTOS_FIELD: &str = "photos";

/// Raw create form: text fields by name plus photo parts in upload order.
#[derive(Debug, Default)]
pub struct PropertyForm {
    fields: HashMap<String, String>,
    pub photos: Vec<MediaBlob>,
}

impl PropertyForm {
    /// Drain a multipart stream. Later text fields overwrite earlier ones.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| Error::InvalidInput(format!("malformed multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == PHOTOS_FIELD {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::InvalidInput(format!("unreadable photo part: {}", e)))?;
                form.photos.push(MediaBlob {
                    file_name,
                    content_type,
                    data,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| {
                        Error::InvalidInput(format!("unreadable field '{}': {}", name, e))
                    })?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Build from text fields only (no photos).
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            photos: Vec::new(),
        }
    }

    fn optional(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidInput(format!("{} is required", key)))
    }

    fn number(&self, key: &str) -> Result<f64> {
        let raw = self.required(key)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(Error::InvalidInput(format!(
                "{} must be a finite number, got '{}'",
                key, raw
            ))),
        }
    }

    fn whole_number(&self, key: &str) -> Result<i32> {
        let raw = self.required(key)?;
        raw.parse::<i32>().map_err(|_| {
            Error::InvalidInput(format!("{} must be a whole number, got '{}'", key, raw))
        })
    }

    fn flag(&self, key: &str) -> bool {
        self.optional(key) == Some("true")
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.optional(key).map(split_list).unwrap_or_default()
    }

    pub fn address(&self) -> Result<AddressFields> {
        Ok(AddressFields {
            address: self.required("address")?,
            city: self.required("city")?,
            state: self.required("state")?,
            country: self.required("country")?,
            postal_code: self.required("postalCode")?,
        })
    }

    pub fn details(&self) -> Result<PropertyDetails> {
        let property_type = match self.optional("propertyType") {
            Some(raw) => raw.parse()?,
            None => PropertyType::default(),
        };

        Ok(PropertyDetails {
            name: self.required("name")?,
            description: self.optional("description").unwrap_or_default().to_string(),
            price_per_month: self.number("pricePerMonth")?,
            security_deposit: self.number("securityDeposit")?,
            application_fee: self.number("applicationFee")?,
            beds: self.whole_number("beds")?,
            baths: self.number("baths")?,
            square_feet: self.whole_number("squareFeet")?,
            is_pets_allowed: self.flag("isPetsAllowed"),
            is_parking_included: self.flag("isParkingIncluded"),
            property_type,
            amenities: self.list("amenities"),
            highlights: self.list("highlights"),
        })
    }
}
