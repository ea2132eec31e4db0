//! Server configuration loaded from the environment.

use axum::http::HeaderValue;

use haven_core::defaults::{
    GEOCODER_TIMEOUT_SECS, GEOCODER_URL, GEOCODER_USER_AGENT, MAX_UPLOAD_BYTES,
    PLACEHOLDER_BUCKET_SENTINEL, PRODUCTION_ENV, S3_REGION, SERVER_PORT,
};
use std::time::Duration;

use haven_db::pool::{
    PoolConfig, DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_LIFETIME_SECS, DEFAULT_MIN_CONNECTIONS,
};

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/haven";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_APP_ENV: &str = "development";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Geocoding service settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: GEOCODER_URL.to_string(),
            user_agent: GEOCODER_USER_AGENT.to_string(),
            timeout_secs: GEOCODER_TIMEOUT_SECS,
        }
    }
}

/// Object storage settings for property photos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageConfig {
    pub bucket: Option<String>,
    pub region: String,
    /// Base of public photo URLs; derived from bucket and region when unset.
    pub public_url: Option<String>,
}

impl StorageConfig {
    /// Bucket name, if one is configured for real uploads.
    ///
    /// Unset, blank, and the sample-config sentinel all mean "placeholders only".
    pub fn active_bucket(&self) -> Option<&str> {
        self.bucket
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty() && *b != PLACEHOLDER_BUCKET_SENTINEL)
    }

    /// Base URL for objects in the active bucket.
    pub fn public_base_url(&self) -> Option<String> {
        let bucket = self.active_bucket()?;
        Some(match &self.public_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("https://{}.s3.{}.amazonaws.com", bucket, self.region),
        })
    }
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub app_env: String,
    /// Comma-separated CORS origins.
    pub allowed_origins: String,
    pub geocoder: GeocoderConfig,
    pub storage: StorageConfig,
    pub max_upload_bytes: usize,
    pub pool: PoolConfig,
}

impl ApiConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup.
    ///
    /// Numeric values that fail to parse fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let secs = |key: &str, default: u64| -> u64 {
            lookup(key).and_then(|s| s.parse().ok()).unwrap_or(default)
        };

        Self {
            database_url: var("DATABASE_URL", DEFAULT_DATABASE_URL),
            host: var("HOST", DEFAULT_HOST),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(SERVER_PORT),
            app_env: var("APP_ENV", DEFAULT_APP_ENV),
            allowed_origins: var("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS),
            geocoder: GeocoderConfig {
                url: var("GEOCODER_URL", GEOCODER_URL),
                user_agent: var("GEOCODER_USER_AGENT", GEOCODER_USER_AGENT),
                timeout_secs: lookup("GEOCODER_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(GEOCODER_TIMEOUT_SECS),
            },
            storage: StorageConfig {
                bucket: lookup("S3_BUCKET_NAME"),
                region: var("AWS_REGION", S3_REGION),
                public_url: lookup("S3_PUBLIC_URL"),
            },
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_UPLOAD_BYTES),
            pool: PoolConfig::new()
                .max_connections(
                    lookup("DB_MAX_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(DEFAULT_MAX_CONNECTIONS),
                )
                .min_connections(
                    lookup("DB_MIN_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(DEFAULT_MIN_CONNECTIONS),
                )
                .acquire_timeout(Duration::from_secs(secs(
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    DEFAULT_ACQUIRE_TIMEOUT_SECS,
                )))
                .idle_timeout(Duration::from_secs(secs(
                    "DB_IDLE_TIMEOUT_SECS",
                    DEFAULT_IDLE_TIMEOUT_SECS,
                )))
                .max_lifetime_secs(secs("DB_MAX_LIFETIME_SECS", DEFAULT_MAX_LIFETIME_SECS)),
        }
    }

    /// Whether error bodies should omit debug detail.
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case(PRODUCTION_ENV)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse the CORS allow-list, dropping entries that are not valid header values.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        parse_allowed_origins(&self.allowed_origins)
    }
}

/// Parse a comma-separated origin list.
///
/// A blank list yields the development default.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    if origins.trim().is_empty() {
        return vec![HeaderValue::from_static(DEFAULT_ALLOWED_ORIGINS)];
    }

    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> ApiConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.database_url, "postgres://localhost/haven");
        assert_eq!(config.bind_address(), "0.0.0.0:3002");
        assert_eq!(config.geocoder, GeocoderConfig::default());
        assert_eq!(config.storage.region, "us-east-1");
        assert_eq!(config.max_upload_bytes, 52_428_800);
        assert_eq!(config.pool, PoolConfig::default());
        assert!(!config.is_production());
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let config = config_with(&[
            ("PORT", "not-a-port"),
            ("GEOCODER_TIMEOUT_SECS", "soon"),
            ("DB_MAX_CONNECTIONS", "-1"),
        ]);
        assert_eq!(config.port, 3002);
        assert_eq!(config.geocoder.timeout_secs, 10);
        assert_eq!(config.pool.max_connections, 10);
    }

    #[test]
    fn test_pool_settings_from_env() {
        let config = config_with(&[
            ("DB_MAX_CONNECTIONS", "25"),
            ("DB_MIN_CONNECTIONS", "4"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "5"),
            ("DB_IDLE_TIMEOUT_SECS", "120"),
            ("DB_MAX_LIFETIME_SECS", "0"),
        ]);
        assert_eq!(
            config.pool,
            PoolConfig::new()
                .max_connections(25)
                .min_connections(4)
                .acquire_timeout(Duration::from_secs(5))
                .idle_timeout(Duration::from_secs(120))
                .max_lifetime_secs(0)
        );
    }

    #[test]
    fn test_production_env() {
        assert!(config_with(&[("APP_ENV", "production")]).is_production());
        assert!(config_with(&[("APP_ENV", "Production")]).is_production());
        assert!(!config_with(&[("APP_ENV", "staging")]).is_production());
    }

    #[test]
    fn test_storage_unconfigured_bucket() {
        assert_eq!(config_with(&[]).storage.active_bucket(), None);
        assert_eq!(
            config_with(&[("S3_BUCKET_NAME", "  ")]).storage.active_bucket(),
            None
        );
        assert_eq!(
            config_with(&[("S3_BUCKET_NAME", "your-s3-bucket-name")])
                .storage
                .active_bucket(),
            None
        );
    }

    #[test]
    fn test_storage_public_url_derivation() {
        let config = config_with(&[("S3_BUCKET_NAME", "listings"), ("AWS_REGION", "eu-west-1")]);
        assert_eq!(config.storage.active_bucket(), Some("listings"));
        assert_eq!(
            config.storage.public_base_url().as_deref(),
            Some("https://listings.s3.eu-west-1.amazonaws.com")
        );

        let config = config_with(&[
            ("S3_BUCKET_NAME", "listings"),
            ("S3_PUBLIC_URL", "https://cdn.example.com/"),
        ]);
        assert_eq!(
            config.storage.public_base_url().as_deref(),
            Some("https://cdn.example.com")
        );
    }

    #[test]
    fn test_cors_allowed_origins_parsing() {
        let origins = parse_allowed_origins("https://haven.example.com");
        assert_eq!(origins.len(), 1);

        let origins =
            parse_allowed_origins("https://haven.example.com, http://localhost:3000 ,");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1].to_str().unwrap(), "http://localhost:3000");

        let origins = parse_allowed_origins("   ");
        assert_eq!(origins, vec![HeaderValue::from_static("http://localhost:3000")]);
    }
}
