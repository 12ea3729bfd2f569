//! # reviews-api
//!
//! HTTP surface of the product reviews service: the axum [`Router`], shared
//! [`AppState`], and request handlers. The `reviews-api` binary wires these
//! to a PostgreSQL pool from `reviews-db`.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use uuid::Uuid;

use reviews_core::ReviewRepository;
use reviews_db::Database;

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<dyn ReviewRepository>,
}

impl AppState {
    /// State backed by the PostgreSQL repository.
    pub fn new(db: Database) -> Self {
        Self::with_repository(Arc::new(db.reviews))
    }

    pub fn with_repository(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }
}

/// Request ID generator using UUIDv7 for time-ordered request tracing.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Reviews API",
        description = "Review listing, aggregates, submission, and moderation votes"
    ),
    paths(
        handlers::reviews::list_reviews,
        handlers::reviews::get_review_meta,
        handlers::reviews::create_review,
        handlers::reviews::mark_review_helpful,
        handlers::reviews::report_review,
    ),
    components(schemas(
        reviews_core::ReviewSort,
        reviews_core::ReviewPhoto,
        reviews_core::ReviewSummary,
        reviews_core::ListReviewsResponse,
        reviews_core::CharacteristicAverage,
        reviews_core::ReviewMeta,
        handlers::reviews::CreateReviewBody,
        handlers::reviews::CreatedReview,
    )),
    tags(
        (name = "Reviews", description = "Product reviews"),
        (name = "System", description = "Health checks and API description")
    )
)]
pub struct ApiDoc;

/// Build the application router with middleware.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/openapi.json", get(openapi_json))
        .route(
            "/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        .route("/reviews/meta", get(handlers::get_review_meta))
        .route("/reviews/:review_id/helpful", put(handlers::mark_review_helpful))
        .route("/reviews/:review_id/report", put(handlers::report_review))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
