//! Structured logging field name constants for haven.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query by the same keys across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Persistence failure surfaced to a caller |
//! | WARN  | Recoverable issue, fallback value substituted |
//! | INFO  | Lifecycle events, completed create/search operations |
//! | DEBUG | Decision points (predicate count, storage mode) |
//! | TRACE | Per-item detail (individual uploads, bound parameters) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "database", "geocoding", "media"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "predicate_compiler", "nominatim", "ingestor"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "create", "resolve", "ingest"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Property id being operated on.
pub const PROPERTY_ID: &str = "property_id";

/// Location id being operated on.
pub const LOCATION_ID: &str = "location_id";

/// Cognito subject of the creating manager.
pub const MANAGER_ID: &str = "manager_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a search.
pub const RESULT_COUNT: &str = "result_count";

/// Number of compiled predicates in a search plan.
pub const PREDICATE_COUNT: &str = "predicate_count";

/// Number of media blobs received for ingestion.
pub const MEDIA_COUNT: &str = "media_count";

/// Number of photo URLs that fell back to a placeholder.
pub const PLACEHOLDER_COUNT: &str = "placeholder_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether a fallback value was substituted.
pub const DEGRADED: &str = "degraded";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
