//! Review service - Product reviews written by customers.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{MAX_RATING, MIN_RATING};
use crate::domain::{ensure_access, ensure_owner, Caller, Review};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Review service trait for dependency injection.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Public list of a product's reviews
    async fn list_reviews(&self, product_id: Uuid) -> AppResult<Vec<Review>>;

    async fn create_review(
        &self,
        caller: Caller,
        product_id: Uuid,
        rating: i32,
        comment: String,
    ) -> AppResult<Review>;

    async fn get_review(&self, caller: Caller, id: Uuid) -> AppResult<Review>;

    /// Only the author may edit a review
    async fn update_review(
        &self,
        caller: Caller,
        id: Uuid,
        rating: Option<i32>,
        comment: Option<String>,
    ) -> AppResult<Review>;

    /// The author or an administrator may delete a review
    async fn delete_review(&self, caller: Caller, id: Uuid) -> AppResult<()>;
}

pub struct ReviewManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReviewManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn validate_rating(rating: i32) -> AppResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )))
    }
}

#[async_trait]
impl<U: UnitOfWork> ReviewService for ReviewManager<U> {
    async fn list_reviews(&self, product_id: Uuid) -> AppResult<Vec<Review>> {
        self.uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found()?;
        self.uow.reviews().list_for_product(product_id).await
    }

    async fn create_review(
        &self,
        caller: Caller,
        product_id: Uuid,
        rating: i32,
        comment: String,
    ) -> AppResult<Review> {
        validate_rating(rating)?;
        self.uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found()?;

        self.uow
            .reviews()
            .create(product_id, caller.user_id, rating, comment)
            .await
    }

    async fn get_review(&self, caller: Caller, id: Uuid) -> AppResult<Review> {
        let review = self.uow.reviews().find_by_id(id).await?.ok_or_not_found()?;
        ensure_access(&caller, review)
    }

    async fn update_review(
        &self,
        caller: Caller,
        id: Uuid,
        rating: Option<i32>,
        comment: Option<String>,
    ) -> AppResult<Review> {
        if let Some(rating) = rating {
            validate_rating(rating)?;
        }

        let review = self.uow.reviews().find_by_id(id).await?.ok_or_not_found()?;
        let review = ensure_owner(&caller, review)?;

        self.uow.reviews().update(review.id, rating, comment).await
    }

    async fn delete_review(&self, caller: Caller, id: Uuid) -> AppResult<()> {
        let review = self.uow.reviews().find_by_id(id).await?.ok_or_not_found()?;
        let review = ensure_access(&caller, review)?;

        self.uow.reviews().delete(review.id).await
    }
}
