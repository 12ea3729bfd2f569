//! Domain models and request/response types for product reviews.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// STORED ROWS
// =============================================================================

/// A review row as stored in the `reviews` table.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub rating: i32,
    pub summary: Option<String>,
    pub body: String,
    pub recommend: bool,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub date: DateTime<Utc>,
    pub helpfulness: i32,
    pub reported: bool,
}

/// A photo attached to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReviewPhoto {
    pub id: i32,
    #[serde(skip)]
    pub review_id: i32,
    pub url: String,
}

// =============================================================================
// LISTING
// =============================================================================

/// Ordering applied to a review listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSort {
    /// Most recent first.
    #[default]
    Newest,
    /// Most helpful votes first.
    Helpful,
    /// Weighted blend of recency, helpfulness, and rating.
    Relevant,
}

impl ReviewSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Helpful => "helpful",
            Self::Relevant => "relevant",
        }
    }
}

impl FromStr for ReviewSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "helpful" => Ok(Self::Helpful),
            "relevant" => Ok(Self::Relevant),
            other => Err(Error::InvalidInput(format!(
                "sort must be one of newest, helpful, relevant (got '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request for one page of a product's reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListReviewsRequest {
    pub product_id: i32,
    /// 1-based page number.
    pub page: i64,
    /// Reviews per page.
    pub count: i64,
    pub sort: ReviewSort,
}

impl ListReviewsRequest {
    /// Build a request, applying defaults and rejecting pages that would
    /// produce a negative offset.
    pub fn new(
        product_id: i32,
        page: Option<i64>,
        count: Option<i64>,
        sort: Option<ReviewSort>,
    ) -> Result<Self> {
        let page = page.unwrap_or(defaults::PAGE);
        let count = count.unwrap_or(defaults::COUNT);

        if page < 1 {
            return Err(Error::InvalidInput("page must be >= 1".to_string()));
        }
        if count < 1 {
            return Err(Error::InvalidInput("count must be >= 1".to_string()));
        }

        Ok(Self {
            product_id,
            page,
            count,
            sort: sort.unwrap_or_default(),
        })
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.count)
    }
}

/// A review as returned by the listing endpoint, with its photos attached.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReviewSummary {
    pub review_id: i32,
    pub rating: i32,
    pub summary: Option<String>,
    pub recommend: bool,
    pub body: String,
    pub date: DateTime<Utc>,
    pub reviewer_name: String,
    pub helpfulness: i32,
    pub photos: Vec<ReviewPhoto>,
}

/// One page of reviews for a product.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListReviewsResponse {
    pub product: i32,
    pub page: i64,
    pub count: i64,
    pub results: Vec<ReviewSummary>,
}

// =============================================================================
// METADATA
// =============================================================================

/// Average value of one characteristic across a product's reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CharacteristicAverage {
    pub id: i32,
    /// Average rendered with four decimal places, `None` when unrated.
    pub value: Option<String>,
}

impl CharacteristicAverage {
    pub fn new(id: i32, average: Option<f64>) -> Self {
        Self {
            id,
            value: average.map(format_average),
        }
    }
}

/// Render an average with the fixed precision used by the metadata endpoint.
pub fn format_average(value: f64) -> String {
    format!("{:.*}", defaults::CHARACTERISTIC_PRECISION, value)
}

/// Aggregate review metadata for a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReviewMeta {
    pub product_id: i32,
    /// Review count per star rating.
    pub ratings: BTreeMap<i32, i64>,
    /// Review count keyed by `"true"` / `"false"`.
    pub recommended: BTreeMap<String, i64>,
    /// Characteristic name to its id and average value.
    pub characteristics: BTreeMap<String, CharacteristicAverage>,
}

// =============================================================================
// CREATION
// =============================================================================

/// Request for creating a review together with its photos and
/// characteristic ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReviewRequest {
    pub product_id: i32,
    pub rating: i32,
    pub summary: Option<String>,
    pub body: String,
    pub recommend: bool,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub photos: Vec<String>,
    /// Characteristic id to the rating given for it.
    pub characteristics: BTreeMap<i32, i32>,
}
