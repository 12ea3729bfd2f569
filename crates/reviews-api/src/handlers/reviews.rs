//! Review HTTP handlers.
//!
//! Listing and metadata read from the store; creation and the helpful/report
//! votes write to it. Handlers validate input into `reviews-core` request
//! types and leave everything else to the
//! [`ReviewRepository`](reviews_core::ReviewRepository).

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{ApiError, AppState};
use reviews_core::{
    CreateReviewRequest, ListReviewsRequest, ListReviewsResponse, ReviewMeta, ReviewSort,
};

/// Query parameters for listing reviews.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReviewsQuery {
    /// Product whose reviews are listed (required)
    pub product_id: Option<i32>,
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Reviews per page (default 5)
    pub count: Option<i64>,
    /// `newest` (default), `helpful`, or `relevant`
    pub sort: Option<String>,
}

impl ListReviewsQuery {
    pub fn into_request(self) -> Result<ListReviewsRequest, ApiError> {
        let product_id = self.product_id.ok_or_else(product_id_required)?;
        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<ReviewSort>)
            .transpose()?;
        Ok(ListReviewsRequest::new(product_id, self.page, self.count, sort)?)
    }
}

/// Query parameters for review metadata.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MetaQuery {
    /// Product to aggregate (required)
    pub product_id: Option<i32>,
}

/// Request body for submitting a review.
///
/// Every field except `summary` is required. Fields are optional here so a
/// missing one is reported by name instead of as a JSON parse failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateReviewBody {
    pub product_id: Option<i32>,
    /// Star rating, 1 to 5
    pub rating: Option<i32>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub recommend: Option<bool>,
    /// Reviewer display name
    pub name: Option<String>,
    /// Reviewer email
    pub email: Option<String>,
    /// Photo URLs
    pub photos: Option<Vec<String>>,
    /// Characteristic id to rating
    #[schema(value_type = Option<Object>)]
    pub characteristics: Option<BTreeMap<i32, i32>>,
}

impl CreateReviewBody {
    pub fn into_request(self) -> Result<CreateReviewRequest, ApiError> {
        let rating = required(self.rating, "rating")?;
        if !(1..=5).contains(&rating) {
            return Err(ApiError::BadRequest(format!(
                "rating must be between 1 and 5 (got {})",
                rating
            )));
        }

        Ok(CreateReviewRequest {
            product_id: required(self.product_id, "product_id")?,
            rating,
            summary: self.summary,
            body: required(self.body, "body")?,
            recommend: required(self.recommend, "recommend")?,
            reviewer_name: required(self.name, "name")?,
            reviewer_email: required(self.email, "email")?,
            photos: required(self.photos, "photos")?,
            characteristics: required(self.characteristics, "characteristics")?,
        })
    }
}

/// Response for a created review.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedReview {
    pub review_id: i32,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {}", field)))
}

fn product_id_required() -> ApiError {
    ApiError::BadRequest("product_id is required".to_string())
}

/// List one page of a product's reviews.
///
/// Reported reviews are never returned. Each review carries its photos.
#[utoipa::path(
    get,
    path = "/reviews",
    tag = "Reviews",
    params(ListReviewsQuery),
    responses(
        (status = 200, description = "One page of reviews", body = ListReviewsResponse),
        (status = 400, description = "Missing product_id or invalid page, count, or sort"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ListReviewsQuery>,
) -> Result<Json<ListReviewsResponse>, ApiError> {
    let request = query.into_request()?;
    let page = state
        .reviews
        .list(request)
        .await
        .map_err(ApiError::internal("An error occurred while fetching reviews"))?;
    Ok(Json(page))
}

/// Rating, recommendation, and characteristic aggregates for a product.
#[utoipa::path(
    get,
    path = "/reviews/meta",
    tag = "Reviews",
    params(MetaQuery),
    responses(
        (status = 200, description = "Review aggregates", body = ReviewMeta),
        (status = 400, description = "Missing product_id"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_review_meta(
    State(state): State<AppState>,
    Query(query): Query<MetaQuery>,
) -> Result<Json<ReviewMeta>, ApiError> {
    let product_id = query.product_id.ok_or_else(product_id_required)?;
    let meta = state
        .reviews
        .meta(product_id)
        .await
        .map_err(ApiError::internal("An error occurred while fetching review metadata"))?;
    Ok(Json(meta))
}

/// Submit a review with its photos and characteristic ratings.
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "Reviews",
    request_body = CreateReviewBody,
    responses(
        (status = 201, description = "Review created", body = CreatedReview),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Store failure, nothing was saved")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    Json(body): Json<CreateReviewBody>,
) -> Result<(StatusCode, Json<CreatedReview>), ApiError> {
    let request = body.into_request()?;
    let product_id = request.product_id;
    let photo_count = request.photos.len();

    let review_id = state
        .reviews
        .create(request)
        .await
        .map_err(ApiError::internal("An error occurred while creating the review"))?;

    info!(
        subsystem = "api",
        product_id,
        review_id,
        photo_count,
        "Review created"
    );
    Ok((StatusCode::CREATED, Json(CreatedReview { review_id })))
}

/// Count one helpful vote for a review.
#[utoipa::path(
    put,
    path = "/reviews/{review_id}/helpful",
    tag = "Reviews",
    params(("review_id" = i32, Path, description = "Review id")),
    responses(
        (status = 204, description = "Vote recorded"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn mark_review_helpful(
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .reviews
        .mark_helpful(review_id)
        .await
        .map_err(ApiError::internal("An error occurred while marking the review helpful"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flag a review as reported, hiding it from listings and metadata.
#[utoipa::path(
    put,
    path = "/reviews/{review_id}/report",
    tag = "Reviews",
    params(("review_id" = i32, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review reported"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn report_review(
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .reviews
        .report(review_id)
        .await
        .map_err(ApiError::internal("An error occurred while reporting the review"))?;
    info!(subsystem = "api", review_id, "Review reported");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_body() -> serde_json::Value {
        json!({
            "product_id": 40344,
            "rating": 4,
            "summary": "Solid",
            "body": "Held up well over a season of use.",
            "recommend": true,
            "name": "sam",
            "email": "sam@example.com",
            "photos": ["https://img.example/1.jpg"],
            "characteristics": {"14": 5, "15": 3}
        })
    }

    fn bad_request_message(err: ApiError) -> String {
        match err {
            ApiError::BadRequest(msg) => msg,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_create_body_maps_fields() {
        let body: CreateReviewBody = serde_json::from_value(full_body()).unwrap();
        let req = body.into_request().unwrap();
        assert_eq!(req.product_id, 40344);
        assert_eq!(req.reviewer_name, "sam");
        assert_eq!(req.reviewer_email, "sam@example.com");
        assert_eq!(req.summary.as_deref(), Some("Solid"));
        assert_eq!(req.characteristics.get(&14), Some(&5));
        assert_eq!(req.characteristics.get(&15), Some(&3));
    }

    #[test]
    fn test_create_body_summary_optional() {
        let mut value = full_body();
        value.as_object_mut().unwrap().remove("summary");
        let body: CreateReviewBody = serde_json::from_value(value).unwrap();
        assert_eq!(body.into_request().unwrap().summary, None);
    }

    #[test]
    fn test_create_body_missing_field_named() {
        for field in [
            "product_id",
            "rating",
            "body",
            "recommend",
            "name",
            "email",
            "photos",
            "characteristics",
        ] {
            let mut value = full_body();
            value.as_object_mut().unwrap().remove(field);
            let body: CreateReviewBody = serde_json::from_value(value).unwrap();
            let msg = bad_request_message(body.into_request().unwrap_err());
            assert_eq!(msg, format!("Missing required field: {}", field));
        }
    }

    #[test]
    fn test_create_body_rating_out_of_range() {
        let mut value = full_body();
        value["rating"] = json!(6);
        let body: CreateReviewBody = serde_json::from_value(value).unwrap();
        let msg = bad_request_message(body.into_request().unwrap_err());
        assert!(msg.contains("rating"));
    }

    #[test]
    fn test_list_query_requires_product_id() {
        let msg = bad_request_message(ListReviewsQuery::default().into_request().unwrap_err());
        assert_eq!(msg, "product_id is required");
    }

    #[test]
    fn test_list_query_defaults() {
        let req = ListReviewsQuery {
            product_id: Some(7),
            ..Default::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.count, 5);
        assert_eq!(req.sort, ReviewSort::Newest);
    }

    #[test]
    fn test_list_query_rejects_unknown_sort_and_zero_page() {
        let err = ListReviewsQuery {
            product_id: Some(7),
            sort: Some("oldest".into()),
            ..Default::default()
        }
        .into_request()
        .unwrap_err();
        assert!(bad_request_message(err).contains("sort"));

        let err = ListReviewsQuery {
            product_id: Some(7),
            page: Some(0),
            ..Default::default()
        }
        .into_request()
        .unwrap_err();
        assert!(bad_request_message(err).contains("page"));
    }
}
