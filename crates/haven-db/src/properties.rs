//! Property repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use haven_core::defaults::POINT_SRID;
use haven_core::{
    decode_wkt_point, encode_wkt_point, Coordinates, Error, Location, NewProperty, Property, PropertyRepository,
    PropertyType, Result, SearchFilter,
};

use crate::predicate::{bind_params, PredicateCompiler};

/// Columns of the listing projection over `property p JOIN location l`,
/// excluding the point itself.
const PROPERTY_COLUMNS: &str = "p.id, p.name, p.description, p.price_per_month, \
     p.security_deposit, p.application_fee, p.photo_urls, p.amenities, p.highlights, \
     p.is_pets_allowed, p.is_parking_included, p.beds, p.baths, p.square_feet, \
     p.property_type::text AS property_type, p.posted_date, p.average_rating, \
     p.number_of_reviews, p.location_id, p.manager_cognito_id, \
     l.address, l.city, l.state, l.country, l.postal_code";

/// PostgreSQL implementation of PropertyRepository.
#[derive(Clone)]
pub struct PgPropertyRepository {
    pool: Pool<Postgres>,
}

impl PgPropertyRepository {
    /// Create a new PgPropertyRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_property(row: &PgRow, coordinates: Coordinates) -> Result<Property> {
        let property_type: String = row.try_get("property_type")?;
        let property_type: PropertyType = property_type.parse()?;

        Ok(Property {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price_per_month: row.try_get("price_per_month")?,
            security_deposit: row.try_get("security_deposit")?,
            application_fee: row.try_get("application_fee")?,
            photo_urls: row.try_get("photo_urls")?,
            amenities: row.try_get("amenities")?,
            highlights: row.try_get("highlights")?,
            is_pets_allowed: row.try_get("is_pets_allowed")?,
            is_parking_included: row.try_get("is_parking_included")?,
            beds: row.try_get("beds")?,
            baths: row.try_get("baths")?,
            square_feet: row.try_get("square_feet")?,
            property_type,
            posted_date: row.try_get("posted_date")?,
            average_rating: row.try_get("average_rating")?,
            number_of_reviews: row.try_get("number_of_reviews")?,
            location_id: row.try_get("location_id")?,
            manager_cognito_id: row.try_get("manager_cognito_id")?,
            location: Location {
                id: row.try_get("location_id")?,
                address: row.try_get("address")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                country: row.try_get("country")?,
                postal_code: row.try_get("postal_code")?,
                coordinates,
            },
        })
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Property>> {
        let start = Instant::now();
        let predicates = PredicateCompiler::compile(filter);
        let compiled = predicates.build(0);

        let sql = format!(
            "SELECT {PROPERTY_COLUMNS}, \
                 ST_X(l.coordinates::geometry) AS longitude, \
                 ST_Y(l.coordinates::geometry) AS latitude \
             FROM property p \
             JOIN location l ON p.location_id = l.id \
             WHERE {} ORDER BY p.id",
            compiled.where_clause
        );

        let rows = bind_params(sqlx::query(&sql), &compiled.params)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let properties = rows
            .iter()
            .map(|row| {
                let coordinates = Coordinates {
                    longitude: row.try_get("longitude")?,
                    latitude: row.try_get("latitude")?,
                };
                Self::row_to_property(row, coordinates)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "database",
            component = "properties",
            op = "search",
            predicate_count = predicates.len(),
            result_count = properties.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Property search complete"
        );
        Ok(properties)
    }

    async fn fetch(&self, id: i32) -> Result<Property> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS}, ST_AsText(l.coordinates) AS coordinates \
             FROM property p \
             JOIN location l ON p.location_id = l.id \
             WHERE p.id = $1"
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::PropertyNotFound(id))?;

        let wkt: String = row.try_get("coordinates")?;
        Self::row_to_property(&row, decode_wkt_point(&wkt)?)
    }

    async fn create(&self, new: NewProperty) -> Result<Property> {
        let NewProperty {
            address,
            coordinates,
            photo_urls,
            details,
            manager_cognito_id,
        } = new;

        // Both rows or neither: dropping `tx` on any early return rolls back.
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let location_row = sqlx::query(
            "INSERT INTO location (address, city, state, country, postal_code, coordinates)
             VALUES ($1, $2, $3, $4, $5, ST_GeomFromText($6, $7)::geography)
             RETURNING id, ST_AsText(coordinates) AS coordinates",
        )
        .bind(&address.address)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.country)
        .bind(&address.postal_code)
        .bind(encode_wkt_point(&coordinates))
        .bind(POINT_SRID)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let location_id: i32 = location_row.try_get("id")?;
        let wkt: String = location_row.try_get("coordinates")?;
        let stored_coordinates = decode_wkt_point(&wkt)?;

        let property_row = sqlx::query(
            "INSERT INTO property (
                 name, description, price_per_month, security_deposit, application_fee,
                 photo_urls, amenities, highlights, is_pets_allowed, is_parking_included,
                 beds, baths, square_feet, property_type, location_id, manager_cognito_id
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     $14::property_type, $15, $16)
             RETURNING id, posted_date, average_rating, number_of_reviews",
        )
        .bind(&details.name)
        .bind(&details.description)
        .bind(details.price_per_month)
        .bind(details.security_deposit)
        .bind(details.application_fee)
        .bind(&photo_urls)
        .bind(&details.amenities)
        .bind(&details.highlights)
        .bind(details.is_pets_allowed)
        .bind(details.is_parking_included)
        .bind(details.beds)
        .bind(details.baths)
        .bind(details.square_feet)
        .bind(details.property_type.as_str())
        .bind(location_id)
        .bind(&manager_cognito_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let id: i32 = property_row.try_get("id")?;
        let posted_date = property_row.try_get("posted_date")?;
        let average_rating = property_row.try_get("average_rating")?;
        let number_of_reviews = property_row.try_get("number_of_reviews")?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "properties",
            op = "create",
            property_id = id,
            location_id,
            manager_id = %manager_cognito_id,
            "Property created"
        );

        Ok(Property {
            id,
            name: details.name,
            description: details.description,
            price_per_month: details.price_per_month,
            security_deposit: details.security_deposit,
            application_fee: details.application_fee,
            photo_urls,
            amenities: details.amenities,
            highlights: details.highlights,
            is_pets_allowed: details.is_pets_allowed,
            is_parking_included: details.is_parking_included,
            beds: details.beds,
            baths: details.baths,
            square_feet: details.square_feet,
            property_type: details.property_type,
            posted_date,
            average_rating,
            number_of_reviews,
            location_id,
            manager_cognito_id,
            location: Location {
                id: location_id,
                address: address.address,
                city: address.city,
                state: address.state,
                country: address.country,
                postal_code: address.postal_code,
                coordinates: stored_coordinates,
            },
        })
    }
}
