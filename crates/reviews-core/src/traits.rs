//! Core traits for the reviews service.
//!
//! The HTTP layer depends on [`ReviewRepository`] rather than a concrete
//! store, so handlers can be exercised against any implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

/// Repository for review reads, aggregation, and mutations.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// One page of non-reported reviews for a product, photos attached.
    async fn list(&self, req: ListReviewsRequest) -> Result<ListReviewsResponse>;

    /// Rating, recommendation, and characteristic aggregates for a product.
    async fn meta(&self, product_id: i32) -> Result<ReviewMeta>;

    /// Insert a review with its photos and characteristic ratings as one
    /// unit of work. Returns the new review id.
    async fn create(&self, req: CreateReviewRequest) -> Result<i32>;

    /// Add one helpful vote.
    async fn mark_helpful(&self, review_id: i32) -> Result<()>;

    /// Flag a review as reported, hiding it from listings and metadata.
    async fn report(&self, review_id: i32) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Minimal in-memory repository used to check the trait is object safe
    /// and usable behind `dyn`.
    #[derive(Default)]
    struct MemoryRepository {
        reviews: Mutex<Vec<Review>>,
    }

    #[async_trait]
    impl ReviewRepository for MemoryRepository {
        async fn list(&self, req: ListReviewsRequest) -> Result<ListReviewsResponse> {
            let reviews = self.reviews.lock().unwrap();
            let results = reviews
                .iter()
                .filter(|r| r.product_id == req.product_id && !r.reported)
                .skip(req.offset() as usize)
                .take(req.count as usize)
                .map(|r| ReviewSummary {
                    review_id: r.id,
                    rating: r.rating,
                    summary: r.summary.clone(),
                    recommend: r.recommend,
                    body: r.body.clone(),
                    date: r.date,
                    reviewer_name: r.reviewer_name.clone(),
                    helpfulness: r.helpfulness,
                    photos: Vec::new(),
                })
                .collect();
            Ok(ListReviewsResponse {
                product: req.product_id,
                page: req.page,
                count: req.count,
                results,
            })
        }

        async fn meta(&self, product_id: i32) -> Result<ReviewMeta> {
            Ok(ReviewMeta {
                product_id,
                ..Default::default()
            })
        }

        async fn create(&self, req: CreateReviewRequest) -> Result<i32> {
            let mut reviews = self.reviews.lock().unwrap();
            let id = reviews.len() as i32 + 1;
            reviews.push(Review {
                id,
                product_id: req.product_id,
                rating: req.rating,
                summary: req.summary,
                body: req.body,
                recommend: req.recommend,
                reviewer_name: req.reviewer_name,
                reviewer_email: req.reviewer_email,
                date: chrono::Utc::now(),
                helpfulness: 0,
                reported: false,
            });
            Ok(id)
        }

        async fn mark_helpful(&self, review_id: i32) -> Result<()> {
            let mut reviews = self.reviews.lock().unwrap();
            if let Some(r) = reviews.iter_mut().find(|r| r.id == review_id) {
                r.helpfulness += 1;
            }
            Ok(())
        }

        async fn report(&self, review_id: i32) -> Result<()> {
            let mut reviews = self.reviews.lock().unwrap();
            if let Some(r) = reviews.iter_mut().find(|r| r.id == review_id) {
                r.reported = true;
            }
            Ok(())
        }
    }

    fn create_request(product_id: i32) -> CreateReviewRequest {
        CreateReviewRequest {
            product_id,
            rating: 4,
            summary: None,
            body: "Fits well".to_string(),
            recommend: true,
            reviewer_name: "kim".to_string(),
            reviewer_email: "kim@example.com".to_string(),
            photos: Vec::new(),
            characteristics: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_repository_usable_as_trait_object() {
        let repo: Box<dyn ReviewRepository> = Box::<MemoryRepository>::default();

        let id = repo.create(create_request(12)).await.unwrap();
        repo.mark_helpful(id).await.unwrap();

        let page = repo
            .list(ListReviewsRequest::new(12, None, None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].helpfulness, 1);

        repo.report(id).await.unwrap();
        let page = repo
            .list(ListReviewsRequest::new(12, None, None, None).unwrap())
            .await
            .unwrap();
        assert!(page.results.is_empty());
    }
}
