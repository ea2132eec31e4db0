//! Manager identity extraction from Bearer tokens.
//!
//! Token signatures are verified by the identity provider's gateway in front
//! of this service; here the JWT payload is only decoded to read the subject
//! and role claims.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::ApiError;

/// Role claim value required to create listings.
pub const MANAGER_ROLE: &str = "manager";

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    #[serde(rename = "custom:role")]
    role: Option<String>,
}

/// Authenticated caller holding the manager role.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerIdentity {
    /// Token subject; stored as the property's `manager_cognito_id`.
    pub subject: String,
}

/// Decode the claims segment of a compact JWT.
fn decode_claims(token: &str) -> Result<Claims, ApiError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::Unauthorized("Malformed token".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| ApiError::Unauthorized("Malformed token payload".to_string()))?;

    serde_json::from_slice(&bytes)
        .map_err(|_| ApiError::Unauthorized("Malformed token claims".to_string()))
}

#[async_trait]
impl<S> FromRequestParts<S> for ManagerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let claims = decode_claims(token)?;

        let subject = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Token has no subject".to_string()))?;

        match claims.role.as_deref() {
            Some(role) if role.eq_ignore_ascii_case(MANAGER_ROLE) => Ok(ManagerIdentity { subject }),
            _ => Err(ApiError::Forbidden(format!(
                "Role '{}' required",
                MANAGER_ROLE
            ))),
        }
    }
}
