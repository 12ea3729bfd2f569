//! Default values shared by the API and database layers.

/// Page returned when the client omits `page`.
pub const PAGE: i64 = 1;

/// Reviews per page when the client omits `count`.
pub const COUNT: i64 = 5;

/// Weight of the recency term in the `relevant` sort score.
pub const RELEVANCE_RECENCY_WEIGHT: f64 = 0.3;

/// Weight of the helpfulness term in the `relevant` sort score.
pub const RELEVANCE_HELPFULNESS_WEIGHT: f64 = 0.5;

/// Weight of the rating term in the `relevant` sort score.
pub const RELEVANCE_RATING_WEIGHT: f64 = 0.2;

/// Seconds in a (non-leap) year, used to express recency in years.
pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Decimal places used when rendering characteristic averages.
pub const CHARACTERISTIC_PRECISION: usize = 4;
