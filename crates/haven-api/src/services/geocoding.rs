//! Best-effort address geocoding against a Nominatim-compatible service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use haven_core::{AddressFields, Coordinates, Error, Geocoder, Result};

use crate::config::GeocoderConfig;

/// One search hit. Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Geocoder backed by the Nominatim `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    url: String,
}

impl NominatimGeocoder {
    /// Build a client that identifies itself with `user_agent` and gives up
    /// after `timeout_secs`.
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("geocoder client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Strict lookup; every failure is an error.
    async fn lookup(&self, query: &str) -> Result<Coordinates> {
        let hits: Vec<SearchHit> = self
            .client
            .get(&self.url)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let first = hits
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("no geocoding match for '{}'", query)))?;

        let longitude: f64 = first
            .lon
            .trim()
            .parse()
            .map_err(|_| Error::Serialization(format!("non-numeric longitude '{}'", first.lon)))?;
        let latitude: f64 = first
            .lat
            .trim()
            .parse()
            .map_err(|_| Error::Serialization(format!("non-numeric latitude '{}'", first.lat)))?;

        Coordinates::new(longitude, latitude)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &AddressFields) -> Coordinates {
        let query = address.full_address();
        let start = Instant::now();

        match self.lookup(&query).await {
            Ok(coordinates) => {
                debug!(
                    subsystem = "geocoding",
                    component = "nominatim",
                    op = "resolve",
                    longitude = coordinates.longitude,
                    latitude = coordinates.latitude,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Address resolved"
                );
                coordinates
            }
            Err(e) => {
                warn!(
                    subsystem = "geocoding",
                    component = "nominatim",
                    op = "resolve",
                    degraded = true,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Geocoding failed, using sentinel coordinates"
                );
                Coordinates::SENTINEL
            }
        }
    }
}
