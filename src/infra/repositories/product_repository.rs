//! Product repository: products and their image references.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use super::entities::product_image::{self, Entity as ImageEntity};
use crate::config::PRODUCT_IN_ORDERS;
use crate::domain::{NewProduct, Product, ProductChanges, ProductImage};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Find every product whose ID is in `ids`
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>>;

    /// List products, newest first
    async fn list(&self) -> AppResult<Vec<Product>>;

    /// Create a new product
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// Apply the given changes
    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product>;

    /// Delete product by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Images registered for a product
    async fn list_images(&self, product_id: Uuid) -> AppResult<Vec<ProductImage>>;

    /// Register an externally stored image
    async fn add_image(&self, product_id: Uuid, url: String, alt_text: String)
        -> AppResult<ProductImage>;

    /// Remove an image of the given product
    async fn delete_image(&self, product_id: Uuid, image_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn list(&self) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, new: NewProduct) -> AppResult<Product> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            description: Set(new.description),
            price: Set(new.price),
            stock: Set(new.stock),
            category_id: Set(new.category_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let existing = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(stock);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::referenced(e, PRODUCT_IN_ORDERS))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_images(&self, product_id: Uuid) -> AppResult<Vec<ProductImage>> {
        let models = ImageEntity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(ProductImage::from).collect())
    }

    async fn add_image(
        &self,
        product_id: Uuid,
        url: String,
        alt_text: String,
    ) -> AppResult<ProductImage> {
        let active_model = product_image::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            url: Set(url),
            alt_text: Set(alt_text),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(ProductImage::from(model))
    }

    async fn delete_image(&self, product_id: Uuid, image_id: Uuid) -> AppResult<()> {
        let result = ImageEntity::delete_many()
            .filter(product_image::Column::Id.eq(image_id))
            .filter(product_image::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
