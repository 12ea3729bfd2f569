//! # reviews-db
//!
//! PostgreSQL database layer for the product reviews service.
//!
//! This crate provides:
//! - Connection pool management and environment-driven connection config
//! - The [`PgReviewRepository`] implementation of [`ReviewRepository`]
//! - A bundled schema and the `reviews-load` bootstrap binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use reviews_db::{Database, DbConfig, ListReviewsRequest, ReviewRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect_with_config(&DbConfig::from_env()?).await?;
//!
//!     let page = db
//!         .reviews
//!         .list(ListReviewsRequest::new(40344, None, None, None)?)
//!         .await?;
//!
//!     println!("{} reviews on page 1", page.results.len());
//!     Ok(())
//! }
//! ```
pub mod bootstrap;
pub mod config;
pub mod pool;
pub mod reviews;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use reviews_core::*;

pub use bootstrap::{bootstrap_schema, run_script, run_script_file, SCHEMA_SQL};
pub use config::DbConfig;
pub use pool::{
    create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig,
};
pub use reviews::PgReviewRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Review repository for listing, aggregation, and mutations.
    pub reviews: PgReviewRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            reviews: PgReviewRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Connect eagerly using environment-derived configuration.
    pub async fn connect_with_config(config: &DbConfig) -> Result<Self> {
        let pool = create_pool_with_config(config.connect_options()?, config.pool_config()).await?;
        Ok(Self::new(pool))
    }

    /// Build a Database whose connections open on first use.
    pub fn connect_lazy(config: &DbConfig) -> Result<Self> {
        let pool = create_lazy_pool(config.connect_options()?, config.pool_config());
        Ok(Self::new(pool))
    }

    /// Create the review schema if it does not exist.
    pub async fn bootstrap(&self) -> Result<()> {
        bootstrap_schema(&self.pool).await
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
