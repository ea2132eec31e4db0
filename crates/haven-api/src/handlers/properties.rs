//! Listing search, read and create handlers.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use haven_core::{Property, SearchFilter, SearchParams};

use crate::auth::ManagerIdentity;
use crate::error::ApiError;
use crate::form::PropertyForm;
use crate::services::{CreatePropertyRequest, CreatedProperty};
use crate::state::AppState;

/// `GET /properties`
pub async fn list_properties(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let filter = SearchFilter::from_params(&params)?;
    let properties = state.properties.search(&filter).await?;
    Ok(Json(properties))
}

/// `GET /properties/:id`
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Property>, ApiError> {
    let id: i32 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid property id '{}'", id)))?;
    let property = state.properties.fetch(id).await?;
    Ok(Json(property))
}

/// `POST /properties` (multipart, manager only)
pub async fn create_property(
    State(state): State<AppState>,
    manager: ManagerIdentity,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedProperty>), ApiError> {
    let form = PropertyForm::from_multipart(multipart).await?;
    let address = form.address()?;
    let details = form.details()?;

    debug!(
        subsystem = "api",
        op = "create",
        manager_id = %manager.subject,
        media_count = form.photos.len(),
        "Create listing request parsed"
    );

    let created = state
        .properties
        .create(CreatePropertyRequest {
            address,
            details,
            photos: form.photos,
            manager_cognito_id: manager.subject,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
