//! Structured logging field names for the reviews service.
//!
//! Every crate logs with these names so log aggregation can query by the
//! same keys across the API and database layers.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed on the server side (500) |
//! | WARN  | Recoverable issue, e.g. pool exhaustion |
//! | INFO  | Lifecycle events (startup, bootstrap), review creation |
//! | DEBUG | Query shapes, row counts, timings |
//! | TRACE | Per-row data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event. Values: "api", "database".
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem. Examples: "reviews", "pool", "bootstrap".
pub const COMPONENT: &str = "component";

/// Logical operation name. Examples: "list", "meta", "create", "mark_helpful".
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Product the request is scoped to.
pub const PRODUCT_ID: &str = "product_id";

/// Review being operated on.
pub const REVIEW_ID: &str = "review_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of photo rows fetched or inserted.
pub const PHOTO_COUNT: &str = "photo_count";

/// Number of characteristic rows inserted.
pub const CHARACTERISTIC_COUNT: &str = "characteristic_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of open connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
