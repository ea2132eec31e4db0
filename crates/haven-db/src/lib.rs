//! # haven-db
//!
//! PostgreSQL/PostGIS database layer for the haven listings backend.
//!
//! This crate provides:
//! - Connection pool management
//! - The search predicate compiler
//! - The property repository, including the atomic location + property create
//!
//! ## Example
//!
//! ```rust,ignore
//! use haven_db::{Database, PropertyRepository, SearchFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/haven").await?;
//!     db.migrate().await?;
//!
//!     let all = db.properties.search(&SearchFilter::new()).await?;
//!     println!("{} listings", all.len());
//!     Ok(())
//! }
//! ```
pub mod pool;
pub mod predicate;
pub mod properties;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use haven_core::*;

pub use pool::{PoolConfig, PoolStats};
pub use predicate::{bind_params, CompiledPredicates, Predicate, PredicateCompiler, PredicateSet, QueryParam};
pub use properties::PgPropertyRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Listing search, fetch and create.
    pub properties: PgPropertyRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            properties: PgPropertyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = config.connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Round-trip a trivial query and report pool occupancy.
    pub async fn ping(&self) -> Result<PoolStats> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        let stats = PoolStats::of(&self.pool);
        stats.log();
        Ok(stats)
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
