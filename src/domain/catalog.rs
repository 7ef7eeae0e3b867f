//! Catalog entities: products, categories, images, reviews and wishlists.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::caller::Owned;

/// Sellable product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Desk Lamp")]
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    /// Units available; never negative
    #[schema(example = 12)]
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether `quantity` units can be taken from stock right now.
    pub fn has_stock_for(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}

/// Product creation data
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<Uuid>,
}

/// Partial product update
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category_id: Option<Option<Uuid>>,
}

/// Product category, optionally nested under a parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Lighting")]
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Category with the names of its direct subcategories
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub subcategories: Vec<String>,
}

impl CategoryResponse {
    pub fn new(category: Category, subcategories: Vec<String>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            parent_id: category.parent_id,
            subcategories,
        }
    }
}

/// Reference to an externally stored product image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    #[schema(example = "https://cdn.example.com/lamp.jpg")]
    pub url: String,
    pub alt_text: String,
}

/// Product with its category, images and rating summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub images: Vec<ProductImage>,
    #[schema(example = 4.5)]
    pub average_rating: f64,
}

/// Customer review of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    #[schema(minimum = 1, maximum = 5, example = 5)]
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Review {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Product saved to a user's wishlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub added_at: DateTime<Utc>,
}

impl Owned for WishlistItem {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Wishlist line as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WishlistEntry {
    pub id: Uuid,
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// Mean of the given ratings, 0 when there are none.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    sum as f64 / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[4, 5]), 4.5);
        assert_eq!(average_rating(&[1, 2, 3]), 2.0);
    }

    #[test]
    fn test_has_stock_for() {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: "Lamp".to_string(),
            description: String::new(),
            price: Decimal::new(1000, 2),
            stock: 2,
            category_id: None,
            created_at: now,
            updated_at: now,
        };

        assert!(product.has_stock_for(2));
        assert!(!product.has_stock_for(3));
    }
}
