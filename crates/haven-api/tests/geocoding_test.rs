//! Geocoding degradation against a mocked Nominatim endpoint.
//!
//! Every failure mode must resolve to the (0, 0) sentinel rather than an error.

use std::time::Duration;

use haven_api::config::GeocoderConfig;
use haven_api::services::NominatimGeocoder;
use haven_core::{AddressFields, Coordinates, Geocoder};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn address() -> AddressFields {
    AddressFields {
        address: "12 Ocean Ave".to_string(),
        city: "Santa Monica".to_string(),
        state: "CA".to_string(),
        country: "United States".to_string(),
        postal_code: "90401".to_string(),
    }
}

fn geocoder_for(server: &MockServer, timeout_secs: u64) -> NominatimGeocoder {
    NominatimGeocoder::new(&GeocoderConfig {
        url: format!("{}/search", server.uri()),
        user_agent: "RealEstateApp/1.0".to_string(),
        timeout_secs,
    })
    .expect("Failed to build geocoder")
}

#[tokio::test]
async fn test_first_hit_is_parsed_with_identity_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "json"))
        .and(query_param(
            "q",
            "12 Ocean Ave, Santa Monica, CA, United States, 90401",
        ))
        .and(header("User-Agent", "RealEstateApp/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "34.0122", "lon": "-118.4965", "display_name": "Ocean Ave" },
            { "lat": "1.0", "lon": "1.0" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let coords = geocoder_for(&server, 5).resolve(&address()).await;
    assert_eq!(
        coords,
        Coordinates {
            longitude: -118.4965,
            latitude: 34.0122
        }
    );
}

#[tokio::test]
async fn test_empty_result_degrades_to_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let coords = geocoder_for(&server, 5).resolve(&address()).await;
    assert!(coords.is_sentinel());
}

#[tokio::test]
async fn test_non_numeric_coordinates_degrade_to_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "north-ish", "lon": "-118.4965" }
        ])))
        .mount(&server)
        .await;

    let coords = geocoder_for(&server, 5).resolve(&address()).await;
    assert_eq!(coords, Coordinates::SENTINEL);
}

#[tokio::test]
async fn test_server_error_degrades_to_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let coords = geocoder_for(&server, 5).resolve(&address()).await;
    assert!(coords.is_sentinel());
}

#[tokio::test]
async fn test_malformed_body_degrades_to_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let coords = geocoder_for(&server, 5).resolve(&address()).await;
    assert!(coords.is_sentinel());
}

#[tokio::test]
async fn test_slow_service_degrades_to_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "lat": "1.0", "lon": "2.0" }]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let coords = geocoder_for(&server, 1).resolve(&address()).await;
    assert!(coords.is_sentinel());
}

#[tokio::test]
async fn test_unreachable_service_degrades_to_sentinel() {
    let geocoder = NominatimGeocoder::new(&GeocoderConfig {
        url: "http://127.0.0.1:9/search".to_string(),
        user_agent: "RealEstateApp/1.0".to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    assert!(geocoder.resolve(&address()).await.is_sentinel());
}
