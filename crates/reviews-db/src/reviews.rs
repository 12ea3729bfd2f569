//! Review repository implementation.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::{debug, field, info, Instrument};

use reviews_core::{
    defaults, logging, CharacteristicAverage, CreateReviewRequest, Error, ListReviewsRequest,
    ListReviewsResponse, Result, ReviewMeta, ReviewPhoto, ReviewRepository, ReviewSort,
    ReviewSummary,
};

/// PostgreSQL implementation of ReviewRepository.
#[derive(Clone)]
pub struct PgReviewRepository {
    pool: Pool<Postgres>,
}

impl PgReviewRepository {
    /// Create a new PgReviewRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

// =============================================================================
// QUERY BUILDING
// =============================================================================

/// Build the ORDER BY clause for a sort mode.
///
/// Every mode ends with `date DESC, id DESC` so pages stay stable when the
/// primary key ties.
pub(crate) fn build_order_clause(sort: ReviewSort) -> String {
    match sort {
        ReviewSort::Newest => "r.date DESC, r.id DESC".to_string(),
        ReviewSort::Helpful => "r.helpfulness DESC, r.date DESC, r.id DESC".to_string(),
        ReviewSort::Relevant => format!(
            "({} * (EXTRACT(EPOCH FROM r.date)::float8 / {:.1}) \
             + {} * (r.helpfulness::float8 / (r.helpfulness + 1)) \
             + {} * (r.rating::float8 / 5)) DESC, r.date DESC, r.id DESC",
            defaults::RELEVANCE_RECENCY_WEIGHT,
            defaults::SECONDS_PER_YEAR,
            defaults::RELEVANCE_HELPFULNESS_WEIGHT,
            defaults::RELEVANCE_RATING_WEIGHT,
        ),
    }
}

fn list_query(sort: ReviewSort) -> String {
    format!(
        r#"
        SELECT r.id, r.rating, r.summary, r.recommend, r.body, r.date,
               r.reviewer_name, r.helpfulness
        FROM reviews r
        WHERE r.product_id = $1 AND r.reported = false
        ORDER BY {}
        LIMIT $2 OFFSET $3
        "#,
        build_order_clause(sort)
    )
}

/// Attach photos to their reviews, keeping review order and photo order.
///
/// Photos whose review is not in `reviews` are dropped.
pub(crate) fn attach_photos(
    mut reviews: Vec<ReviewSummary>,
    photos: Vec<ReviewPhoto>,
) -> Vec<ReviewSummary> {
    let mut by_review: HashMap<i32, Vec<ReviewPhoto>> = HashMap::new();
    for photo in photos {
        by_review.entry(photo.review_id).or_default().push(photo);
    }

    for review in &mut reviews {
        if let Some(photos) = by_review.remove(&review.review_id) {
            review.photos = photos;
        }
    }
    reviews
}

/// Assemble the metadata response from the three aggregate result sets.
pub(crate) fn build_meta(
    product_id: i32,
    ratings: Vec<(i32, i64)>,
    recommended: Vec<(bool, i64)>,
    characteristics: Vec<(i32, String, Option<f64>)>,
) -> ReviewMeta {
    let ratings: BTreeMap<i32, i64> = ratings.into_iter().collect();

    let recommended: BTreeMap<String, i64> = recommended
        .into_iter()
        .map(|(recommend, count)| (recommend.to_string(), count))
        .collect();

    let characteristics: BTreeMap<String, CharacteristicAverage> = characteristics
        .into_iter()
        .map(|(id, name, average)| (name, CharacteristicAverage::new(id, average)))
        .collect();

    ReviewMeta {
        product_id,
        ratings,
        recommended,
        characteristics,
    }
}

// =============================================================================
// REPOSITORY
// =============================================================================

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn list(&self, req: ListReviewsRequest) -> Result<ListReviewsResponse> {
        let span = tracing::debug_span!(
            "reviews.list",
            subsystem = "database",
            product_id = req.product_id,
            sort = %req.sort,
            result_count = field::Empty,
            duration_ms = field::Empty,
        );

        async move {
            let start = Instant::now();

            let rows = sqlx::query(&list_query(req.sort))
                .bind(req.product_id)
                .bind(req.count)
                .bind(req.offset())
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;

            let reviews: Vec<ReviewSummary> = rows
                .into_iter()
                .map(|row| ReviewSummary {
                    review_id: row.get("id"),
                    rating: row.get("rating"),
                    summary: row.get("summary"),
                    recommend: row.get("recommend"),
                    body: row.get("body"),
                    date: row.get::<DateTime<Utc>, _>("date"),
                    reviewer_name: row.get("reviewer_name"),
                    helpfulness: row.get("helpfulness"),
                    photos: Vec::new(),
                })
                .collect();

            let results = if reviews.is_empty() {
                reviews
            } else {
                let review_ids: Vec<i32> = reviews.iter().map(|r| r.review_id).collect();
                let photos = self.photos_for(&review_ids).await?;
                attach_photos(reviews, photos)
            };

            let span = tracing::Span::current();
            span.record(logging::RESULT_COUNT, results.len() as u64);
            span.record(logging::DURATION_MS, start.elapsed().as_millis() as u64);
            debug!("Listed reviews");

            Ok(ListReviewsResponse {
                product: req.product_id,
                page: req.page,
                count: req.count,
                results,
            })
        }
        .instrument(span)
        .await
    }

    async fn meta(&self, product_id: i32) -> Result<ReviewMeta> {
        let start = Instant::now();

        let ratings = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT rating, COUNT(*) AS count
            FROM reviews
            WHERE product_id = $1 AND reported = false
            GROUP BY rating
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool);

        let recommended = sqlx::query_as::<_, (bool, i64)>(
            r#"
            SELECT recommend, COUNT(*) AS count
            FROM reviews
            WHERE product_id = $1 AND reported = false
            GROUP BY recommend
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool);

        let characteristics = sqlx::query_as::<_, (i32, String, Option<f64>)>(
            r#"
            SELECT c.id, c.name, AVG(cr.value)::float8 AS average
            FROM characteristics c
            LEFT JOIN (
                characteristic_reviews cr
                JOIN reviews r ON r.id = cr.review_id AND r.reported = false
            ) ON cr.characteristic_id = c.id
            WHERE c.product_id = $1
            GROUP BY c.id, c.name
            ORDER BY c.id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool);

        let (ratings, recommended, characteristics) =
            tokio::try_join!(ratings, recommended, characteristics).map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "reviews",
            op = "meta",
            product_id,
            rating_buckets = ratings.len(),
            characteristic_count = characteristics.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Aggregated review metadata"
        );

        Ok(build_meta(product_id, ratings, recommended, characteristics))
    }

    async fn create(&self, req: CreateReviewRequest) -> Result<i32> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let review_id = self.insert_tx(&mut tx, &req).await?;
        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "reviews",
            op = "create",
            product_id = req.product_id,
            review_id,
            photo_count = req.photos.len(),
            characteristic_count = req.characteristics.len(),
            "Review created"
        );
        Ok(review_id)
    }

    async fn mark_helpful(&self, review_id: i32) -> Result<()> {
        let result =
            sqlx::query("UPDATE reviews SET helpfulness = helpfulness + 1 WHERE id = $1")
                .bind(review_id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "reviews",
            op = "mark_helpful",
            review_id,
            rows_affected = result.rows_affected(),
            "Helpful vote recorded"
        );
        Ok(())
    }

    async fn report(&self, review_id: i32) -> Result<()> {
        let result = sqlx::query("UPDATE reviews SET reported = true WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "reviews",
            op = "report",
            review_id,
            rows_affected = result.rows_affected(),
            "Review reported"
        );
        Ok(())
    }
}

/// Helpers shared by the trait methods and usable inside a caller's transaction.
impl PgReviewRepository {
    /// Fetch photos for a batch of reviews, ordered by photo id.
    pub async fn photos_for(&self, review_ids: &[i32]) -> Result<Vec<ReviewPhoto>> {
        let rows = sqlx::query(
            "SELECT id, review_id, url FROM review_photos WHERE review_id = ANY($1) ORDER BY id",
        )
        .bind(review_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| ReviewPhoto {
                id: row.get("id"),
                review_id: row.get("review_id"),
                url: row.get("url"),
            })
            .collect())
    }

    /// Insert a review, its photos, and its characteristic ratings within `tx`.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        req: &CreateReviewRequest,
    ) -> Result<i32> {
        let review_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews
                (product_id, rating, summary, body, recommend, reviewer_name,
                 reviewer_email, date, helpfulness, reported)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, false)
            RETURNING id
            "#,
        )
        .bind(req.product_id)
        .bind(req.rating)
        .bind(&req.summary)
        .bind(&req.body)
        .bind(req.recommend)
        .bind(&req.reviewer_name)
        .bind(&req.reviewer_email)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        if !req.photos.is_empty() {
            sqlx::query(
                "INSERT INTO review_photos (review_id, url) SELECT $1, UNNEST($2::text[])",
            )
            .bind(review_id)
            .bind(&req.photos)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }

        if !req.characteristics.is_empty() {
            let (ids, values): (Vec<i32>, Vec<i32>) =
                req.characteristics.iter().map(|(id, v)| (*id, *v)).unzip();
            sqlx::query(
                r#"
                INSERT INTO characteristic_reviews (characteristic_id, review_id, value)
                SELECT c.id, $2, c.value
                FROM UNNEST($1::int4[], $3::int4[]) AS c(id, value)
                "#,
            )
            .bind(&ids)
            .bind(review_id)
            .bind(&values)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }

        Ok(review_id)
    }
}
