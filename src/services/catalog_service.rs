//! Catalog service - Products, product images and categories.
//!
//! Reads are public; every write requires an administrator.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::config::PRODUCT_IN_ORDERS;
use crate::domain::{
    average_rating, Caller, Category, CategoryResponse, NewProduct, Product, ProductChanges,
    ProductDetail, ProductImage,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    /// Product with category, images and average rating
    async fn get_product(&self, id: Uuid) -> AppResult<ProductDetail>;

    async fn create_product(&self, caller: Caller, product: NewProduct) -> AppResult<Product>;

    async fn update_product(
        &self,
        caller: Caller,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Product>;

    async fn delete_product(&self, caller: Caller, id: Uuid) -> AppResult<()>;

    async fn list_images(&self, product_id: Uuid) -> AppResult<Vec<ProductImage>>;

    async fn add_image(
        &self,
        caller: Caller,
        product_id: Uuid,
        url: String,
        alt_text: String,
    ) -> AppResult<ProductImage>;

    async fn delete_image(&self, caller: Caller, product_id: Uuid, image_id: Uuid)
        -> AppResult<()>;

    async fn list_categories(&self) -> AppResult<Vec<CategoryResponse>>;

    async fn get_category(&self, id: Uuid) -> AppResult<CategoryResponse>;

    async fn create_category(
        &self,
        caller: Caller,
        name: String,
        parent_id: Option<Uuid>,
    ) -> AppResult<CategoryResponse>;

    async fn update_category(
        &self,
        caller: Caller,
        id: Uuid,
        name: Option<String>,
        parent_id: Option<Option<Uuid>>,
    ) -> AppResult<CategoryResponse>;

    async fn delete_category(&self, caller: Caller, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_category_exists(&self, category_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = category_id {
            if self.uow.categories().find_by_id(id).await?.is_none() {
                return Err(AppError::validation("Category does not exist"));
            }
        }
        Ok(())
    }

    async fn category_response(&self, category: Category) -> AppResult<CategoryResponse> {
        let children = self.uow.categories().children(category.id).await?;
        let names = children.into_iter().map(|c| c.name).collect();
        Ok(CategoryResponse::new(category, names))
    }
}

fn validate_price_and_stock(price: Option<Decimal>, stock: Option<i32>) -> AppResult<()> {
    if price.is_some_and(|p| p.is_sign_negative()) {
        return Err(AppError::validation("Price must not be negative"));
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(AppError::validation("Stock must not be negative"));
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.uow.products().list().await
    }

    async fn get_product(&self, id: Uuid) -> AppResult<ProductDetail> {
        let product = self.uow.products().find_by_id(id).await?.ok_or_not_found()?;

        let categories = self.uow.categories();
        let category_id = product.category_id;
        let category = async move {
            match category_id {
                Some(category_id) => categories.find_by_id(category_id).await,
                None => Ok(None),
            }
        };
        let products = self.uow.products();
        let reviews = self.uow.reviews();

        let (category, images, ratings) = parallel::join3(
            category,
            products.list_images(id),
            reviews.ratings_for_product(id),
        )
        .await?;

        Ok(ProductDetail {
            product,
            category,
            images,
            average_rating: average_rating(&ratings),
        })
    }

    async fn create_product(&self, caller: Caller, product: NewProduct) -> AppResult<Product> {
        caller.require_admin()?;
        validate_price_and_stock(Some(product.price), Some(product.stock))?;
        self.ensure_category_exists(product.category_id).await?;

        let created = self.uow.products().create(product).await?;
        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    async fn update_product(
        &self,
        caller: Caller,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Product> {
        caller.require_admin()?;
        validate_price_and_stock(changes.price, changes.stock)?;
        self.ensure_category_exists(changes.category_id.flatten()).await?;

        self.uow.products().update(id, changes).await
    }

    async fn delete_product(&self, caller: Caller, id: Uuid) -> AppResult<()> {
        caller.require_admin()?;
        // Order lines keep pointing at their product
        if self.uow.orders().references_product(id).await? {
            return Err(AppError::conflict(PRODUCT_IN_ORDERS));
        }
        self.uow.products().delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    async fn list_images(&self, product_id: Uuid) -> AppResult<Vec<ProductImage>> {
        self.uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found()?;
        self.uow.products().list_images(product_id).await
    }

    async fn add_image(
        &self,
        caller: Caller,
        product_id: Uuid,
        url: String,
        alt_text: String,
    ) -> AppResult<ProductImage> {
        caller.require_admin()?;
        self.uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found()?;
        self.uow.products().add_image(product_id, url, alt_text).await
    }

    async fn delete_image(
        &self,
        caller: Caller,
        product_id: Uuid,
        image_id: Uuid,
    ) -> AppResult<()> {
        caller.require_admin()?;
        self.uow.products().delete_image(product_id, image_id).await
    }

    async fn list_categories(&self) -> AppResult<Vec<CategoryResponse>> {
        let categories = self.uow.categories().list().await?;

        // Categories come back ordered by name, so children stay sorted
        let mut children: HashMap<Uuid, Vec<String>> = HashMap::new();
        for category in &categories {
            if let Some(parent_id) = category.parent_id {
                children
                    .entry(parent_id)
                    .or_default()
                    .push(category.name.clone());
            }
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let names = children.remove(&category.id).unwrap_or_default();
                CategoryResponse::new(category, names)
            })
            .collect())
    }

    async fn get_category(&self, id: Uuid) -> AppResult<CategoryResponse> {
        let category = self.uow.categories().find_by_id(id).await?.ok_or_not_found()?;
        self.category_response(category).await
    }

    async fn create_category(
        &self,
        caller: Caller,
        name: String,
        parent_id: Option<Uuid>,
    ) -> AppResult<CategoryResponse> {
        caller.require_admin()?;

        if self.uow.categories().find_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Category with this name already exists"));
        }
        if let Some(parent_id) = parent_id {
            if self.uow.categories().find_by_id(parent_id).await?.is_none() {
                return Err(AppError::validation("Parent category does not exist"));
            }
        }

        let category = self.uow.categories().create(name, parent_id).await?;
        Ok(CategoryResponse::new(category, Vec::new()))
    }

    async fn update_category(
        &self,
        caller: Caller,
        id: Uuid,
        name: Option<String>,
        parent_id: Option<Option<Uuid>>,
    ) -> AppResult<CategoryResponse> {
        caller.require_admin()?;

        if let Some(Some(parent_id)) = parent_id {
            if parent_id == id {
                return Err(AppError::validation("A category cannot be its own parent"));
            }
            if self.uow.categories().find_by_id(parent_id).await?.is_none() {
                return Err(AppError::validation("Parent category does not exist"));
            }
        }

        let category = self.uow.categories().update(id, name, parent_id).await?;
        self.category_response(category).await
    }

    async fn delete_category(&self, caller: Caller, id: Uuid) -> AppResult<()> {
        caller.require_admin()?;
        self.uow.categories().delete(id).await
    }
}
