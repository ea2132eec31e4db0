//! HTTP handlers for haven-api.

pub mod health;
pub mod properties;

pub use health::health_check;
pub use properties::{create_property, get_property, list_properties};
