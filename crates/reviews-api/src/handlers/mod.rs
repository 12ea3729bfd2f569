//! HTTP handlers for reviews-api.

pub mod reviews;

pub use reviews::{create_review, get_review_meta, list_reviews, mark_review_helpful, report_review};
