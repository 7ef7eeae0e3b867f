//! Catalog, reviews, wishlist and order status against a real (SQLite) database.

mod common;

use common::{customer, test_config, TestShop};
use shop_api::domain::{OrderStatus, ProductChanges};
use shop_api::errors::AppError;
use shop_api::services::ServiceContainer;

#[tokio::test]
async fn test_average_rating_on_product_detail() {
    let shop = TestShop::new().await;
    let lamp = shop.product("Lamp", 10, 5).await;
    let reviews = shop.services.reviews();

    let detail = shop.services.catalog().get_product(lamp.id).await.unwrap();
    assert_eq!(detail.average_rating, 0.0);

    reviews
        .create_review(customer(), lamp.id, 4, "Good".to_string())
        .await
        .unwrap();
    reviews
        .create_review(customer(), lamp.id, 5, "Great".to_string())
        .await
        .unwrap();

    let detail = shop.services.catalog().get_product(lamp.id).await.unwrap();
    assert_eq!(detail.average_rating, 4.5);
    assert_eq!(reviews.list_reviews(lamp.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_only_author_edits_review_but_admin_may_delete() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let reviews = shop.services.reviews();

    let review = reviews
        .create_review(alice, lamp.id, 3, "Fine".to_string())
        .await
        .unwrap();

    let result = reviews
        .update_review(customer(), review.id, Some(1), None)
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));

    let edited = reviews
        .update_review(alice, review.id, Some(5), None)
        .await
        .unwrap();
    assert_eq!(edited.rating, 5);
    assert_eq!(edited.comment, "Fine");

    reviews.delete_review(shop.admin, review.id).await.unwrap();
    assert!(reviews.list_reviews(lamp.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_wishlist_duplicate_conflicts() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let wishlist = shop.services.wishlist();

    let entry = wishlist.add_to_wishlist(alice, lamp.id).await.unwrap();
    assert_eq!(entry.product.id, lamp.id);

    let again = wishlist.add_to_wishlist(alice, lamp.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    // Another user may save the same product
    wishlist.add_to_wishlist(customer(), lamp.id).await.unwrap();

    wishlist.remove_from_wishlist(alice, entry.id).await.unwrap();
    assert!(wishlist.list_wishlist(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_categories_with_subcategories() {
    let shop = TestShop::new().await;
    let catalog = shop.services.catalog();

    let lighting = catalog
        .create_category(shop.admin, "Lighting".to_string(), None)
        .await
        .unwrap();
    catalog
        .create_category(shop.admin, "Desk Lamps".to_string(), Some(lighting.id))
        .await
        .unwrap();

    let duplicate = catalog
        .create_category(shop.admin, "Lighting".to_string(), None)
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let fetched = catalog.get_category(lighting.id).await.unwrap();
    assert_eq!(fetched.subcategories, vec!["Desk Lamps".to_string()]);

    let lamp = shop.product("Lamp", 10, 5).await;
    catalog
        .update_product(
            shop.admin,
            lamp.id,
            ProductChanges {
                category_id: Some(Some(lighting.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let detail = catalog.get_product(lamp.id).await.unwrap();
    assert_eq!(detail.category.map(|c| c.name).as_deref(), Some("Lighting"));
}

#[tokio::test]
async fn test_catalog_writes_require_admin() {
    let shop = TestShop::new().await;
    let lamp = shop.product("Lamp", 10, 5).await;

    let result = shop.services.catalog().delete_product(customer(), lamp.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    shop.services
        .catalog()
        .delete_product(shop.admin, lamp.id)
        .await
        .unwrap();
    assert!(shop.services.catalog().list_products().await.unwrap().is_empty());
}

async fn pending_order(shop: &TestShop) -> uuid::Uuid {
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    shop.address(alice, "Alice", true).await;
    shop.services.carts().add_item(alice, lamp.id, 1).await.unwrap();
    shop.services
        .checkout()
        .checkout(alice, None)
        .await
        .unwrap()
        .order
        .id
}

#[tokio::test]
async fn test_status_update_rules() {
    let shop = TestShop::new().await;
    let order_id = pending_order(&shop).await;
    let orders = shop.services.orders();

    let result = orders
        .update_status(customer(), order_id, "SHIPPED".to_string())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let result = orders
        .update_status(shop.admin, order_id, "LOST".to_string())
        .await;
    assert!(matches!(result, Err(AppError::InvalidStatus(_))));

    let result = orders
        .update_status(shop.admin, uuid::Uuid::new_v4(), "SHIPPED".to_string())
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));

    // Permissive by default: any administrator target from any status
    let change = orders
        .update_status(shop.admin, order_id, "DELIVERED".to_string())
        .await
        .unwrap();
    assert_eq!(change.status, OrderStatus::Delivered);
    assert_eq!(change.message, "Order status updated to DELIVERED");

    orders
        .update_status(shop.admin, order_id, "PAID".to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_strict_lifecycle_rejects_skipping_ahead() {
    let mut config = test_config();
    config.strict_order_lifecycle = true;
    let shop = TestShop::with_config(config).await;
    let order_id = pending_order(&shop).await;
    let orders = shop.services.orders();

    let result = orders
        .update_status(shop.admin, order_id, "DELIVERED".to_string())
        .await;
    assert!(matches!(result, Err(AppError::InvalidTransition { .. })));

    orders
        .update_status(shop.admin, order_id, "CANCELLED".to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_admin_sees_every_order() {
    let shop = TestShop::new().await;
    pending_order(&shop).await;
    pending_order(&shop).await;

    let all = shop.services.orders().list_orders(shop.admin).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|o| o.items.len() == 1));

    let mine = shop.services.orders().list_orders(customer()).await.unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_product_images_are_admin_managed() {
    let shop = TestShop::new().await;
    let lamp = shop.product("Lamp", 10, 5).await;
    let catalog = shop.services.catalog();
    let url = "https://cdn.example.com/lamp.jpg".to_string();

    let result = catalog
        .add_image(customer(), lamp.id, url.clone(), "Lamp".to_string())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let image = catalog
        .add_image(shop.admin, lamp.id, url.clone(), "Lamp".to_string())
        .await
        .unwrap();
    assert_eq!(image.product_id, lamp.id);

    let detail = catalog.get_product(lamp.id).await.unwrap();
    assert_eq!(detail.images.len(), 1);
    assert_eq!(detail.images[0].url, url);

    // Image ids are scoped to their product
    let other = shop.product("Mug", 5, 5).await;
    let result = catalog.delete_image(shop.admin, other.id, image.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    catalog.delete_image(shop.admin, lamp.id, image.id).await.unwrap();
    assert!(catalog.list_images(lamp.id).await.unwrap().is_empty());
}
