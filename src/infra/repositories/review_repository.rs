//! Review repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::review::{self, ActiveModel, Entity as ReviewEntity};
use crate::domain::Review;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Review repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;

    /// Reviews of a product, newest first
    async fn list_for_product(&self, product_id: Uuid) -> AppResult<Vec<Review>>;

    /// Just the ratings of a product's reviews
    async fn ratings_for_product(&self, product_id: Uuid) -> AppResult<Vec<i32>>;

    async fn create(
        &self,
        product_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: String,
    ) -> AppResult<Review>;

    async fn update(
        &self,
        id: Uuid,
        rating: Option<i32>,
        comment: Option<String>,
    ) -> AppResult<Review>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ReviewRepository
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Review::from))
    }

    async fn list_for_product(&self, product_id: Uuid) -> AppResult<Vec<Review>> {
        let models = ReviewEntity::find()
            .filter(review::Column::ProductId.eq(product_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Review::from).collect())
    }

    async fn ratings_for_product(&self, product_id: Uuid) -> AppResult<Vec<i32>> {
        let ratings = ReviewEntity::find()
            .select_only()
            .column(review::Column::Rating)
            .filter(review::Column::ProductId.eq(product_id))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;

        Ok(ratings)
    }

    async fn create(
        &self,
        product_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: String,
    ) -> AppResult<Review> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            user_id: Set(user_id),
            rating: Set(rating),
            comment: Set(comment),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Review::from(model))
    }

    async fn update(
        &self,
        id: Uuid,
        rating: Option<i32>,
        comment: Option<String>,
    ) -> AppResult<Review> {
        let existing = ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(rating) = rating {
            active.rating = Set(rating);
        }
        if let Some(comment) = comment {
            active.comment = Set(comment);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Review::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ReviewEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
