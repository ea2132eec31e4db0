//! Connection pool sizing and saturation reporting.
//!
//! The API server builds a [`PoolConfig`] from its `DB_*` environment
//! variables; test fixtures use a smaller pool. Every value maps onto one
//! `PgPoolOptions` setting.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use haven_core::{Error, Result};

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default minimum number of connections kept open.
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Default time to wait for a free connection, in seconds.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Default idle time before a connection is closed, in seconds.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default connection lifetime, in seconds. Zero disables recycling.
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// Pool sizing and timeouts.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// `None` keeps connections open until they go idle.
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime: Some(Duration::from_secs(DEFAULT_MAX_LIFETIME_SECS)),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Maximum connection lifetime in seconds; `0` disables recycling.
    pub fn max_lifetime_secs(mut self, secs: u64) -> Self {
        self.max_lifetime = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// sqlx options for this configuration.
    ///
    /// The pool always allows at least one connection, and the minimum never
    /// exceeds the maximum.
    pub fn options(&self) -> PgPoolOptions {
        let max = self.max_connections.max(1);
        PgPoolOptions::new()
            .max_connections(max)
            .min_connections(self.min_connections.min(max))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }

    /// Open a pool against `database_url`.
    pub async fn connect(&self, database_url: &str) -> Result<PgPool> {
        let start = Instant::now();
        info!(
            subsystem = "database",
            component = "pool",
            op = "create",
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            acquire_timeout_secs = self.acquire_timeout.as_secs(),
            max_lifetime_secs = self.max_lifetime.map(|d| d.as_secs()).unwrap_or(0),
            "Creating database connection pool"
        );

        let pool = self
            .options()
            .connect(database_url)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "pool",
            op = "established",
            pool_size = pool.size(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Database connection pool established"
        );
        Ok(pool)
    }
}

/// Point-in-time pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

impl PoolStats {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            size: pool.size(),
            idle: pool.num_idle(),
        }
    }

    /// Every open connection is checked out.
    pub fn is_saturated(&self) -> bool {
        self.size > 0 && self.idle == 0
    }

    /// Debug-log the stats; warn when saturated.
    pub fn log(&self) {
        debug!(
            subsystem = "database",
            component = "pool",
            op = "metrics",
            pool_size = self.size,
            pool_idle = self.idle,
            "Pool health check"
        );
        if self.is_saturated() {
            warn!(
                subsystem = "database",
                component = "pool",
                pool_size = self.size,
                "Connection pool has no idle connections, possible exhaustion"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_config() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.max_lifetime, Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_options_carry_every_setting() {
        let options = PoolConfig::new()
            .max_connections(20)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .idle_timeout(Duration::from_secs(45))
            .max_lifetime_secs(900)
            .options();

        assert_eq!(options.get_max_connections(), 20);
        assert_eq!(options.get_min_connections(), 5);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(45)));
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(900)));
    }

    #[test]
    fn test_zero_lifetime_disables_recycling() {
        let config = PoolConfig::new().max_lifetime_secs(0);
        assert_eq!(config.max_lifetime, None);
        assert_eq!(config.options().get_max_lifetime(), None);
    }

    #[test]
    fn test_min_clamped_to_max() {
        let options = PoolConfig::new()
            .max_connections(2)
            .min_connections(8)
            .options();
        assert_eq!(options.get_max_connections(), 2);
        assert_eq!(options.get_min_connections(), 2);

        let options = PoolConfig::new().max_connections(0).min_connections(0).options();
        assert_eq!(options.get_max_connections(), 1);
    }

    #[test]
    fn test_saturation() {
        assert!(PoolStats { size: 4, idle: 0 }.is_saturated());
        assert!(!PoolStats { size: 4, idle: 1 }.is_saturated());
        assert!(!PoolStats { size: 0, idle: 0 }.is_saturated());
    }
}
