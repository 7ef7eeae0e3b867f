//! Cart, checkout and payment flows against a real (SQLite) database.

mod common;

use rust_decimal::Decimal;

use common::{customer, TestShop};
use shop_api::domain::{OrderStatus, ProductChanges};
use shop_api::errors::AppError;
use shop_api::services::{CartItemUpdate, ServiceContainer};

#[tokio::test]
async fn test_cart_is_created_once() {
    let shop = TestShop::new().await;
    let alice = customer();

    let first = shop.services.carts().get_cart(alice).await.unwrap();
    let second = shop.services.carts().get_cart(alice).await.unwrap();

    assert_eq!(first.id, second.id);
    assert!(second.items.is_empty());
    assert_eq!(second.total, Decimal::ZERO);
}

#[tokio::test]
async fn test_adding_more_than_stock_leaves_cart_unchanged() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let carts = shop.services.carts();

    let result = carts.add_item(alice, lamp.id, 6).await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

    carts.add_item(alice, lamp.id, 3).await.unwrap();
    // 3 already in the cart, 3 more would exceed the 5 in stock
    let result = carts.add_item(alice, lamp.id, 3).await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

    let cart = carts.get_cart(alice).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);
}

#[tokio::test]
async fn test_adding_same_product_merges_lines() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let carts = shop.services.carts();

    carts.add_item(alice, lamp.id, 1).await.unwrap();
    let line = carts.add_item(alice, lamp.id, 2).await.unwrap();
    assert_eq!(line.quantity, 3);

    let cart = carts.get_cart(alice).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, Decimal::from(30));
}

#[tokio::test]
async fn test_cart_items_are_private() {
    let shop = TestShop::new().await;
    let alice = customer();
    let bob = customer();
    let lamp = shop.product("Lamp", 10, 5).await;

    let line = shop.services.carts().add_item(alice, lamp.id, 1).await.unwrap();

    let result = shop.services.carts().remove_item(bob, line.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_checkout_empty_cart_fails() {
    let shop = TestShop::new().await;
    let alice = customer();
    shop.address(alice, "Alice", true).await;

    // No cart at all yet
    let result = shop.services.checkout().checkout(alice, None).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    shop.services.carts().get_cart(alice).await.unwrap();
    let result = shop.services.checkout().checkout(alice, None).await;
    assert!(matches!(result, Err(AppError::EmptyCart)));

    let orders = shop.services.orders().list_orders(alice).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_checkout_without_default_address_fails() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    shop.address(alice, "Alice", false).await;
    shop.services.carts().add_item(alice, lamp.id, 1).await.unwrap();

    let result = shop.services.checkout().checkout(alice, None).await;
    assert!(matches!(result, Err(AppError::NoDefaultAddress)));

    // Rolled back: the cart still holds its line
    let cart = shop.services.carts().get_cart(alice).await.unwrap();
    assert_eq!(cart.items.len(), 1);
}

#[tokio::test]
async fn test_checkout_rejects_foreign_address() {
    let shop = TestShop::new().await;
    let alice = customer();
    let bob = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let bobs = shop.address(bob, "Bob", true).await;
    shop.services.carts().add_item(alice, lamp.id, 1).await.unwrap();

    let result = shop.services.checkout().checkout(alice, Some(bobs.id)).await;
    assert!(matches!(result, Err(AppError::InvalidAddress)));
}

#[tokio::test]
async fn test_checkout_then_pay_example() {
    let shop = TestShop::new().await;
    let alice = customer();
    let product = shop.product("A", 10, 5).await;
    shop.address(alice, "Alice", true).await;
    shop.services.carts().add_item(alice, product.id, 2).await.unwrap();

    let order = shop.services.checkout().checkout(alice, None).await.unwrap();
    assert_eq!(order.order.status, OrderStatus::Pending);
    assert_eq!(order.order.total, Decimal::from(20));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].price, Decimal::from(10));
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(
        order.order.shipping_address.as_deref(),
        Some("Alice, 1 Main St, Springfield, IL 62701, US")
    );

    let cart = shop.services.carts().get_cart(alice).await.unwrap();
    assert!(cart.items.is_empty());
    // Nothing is reserved until payment
    assert_eq!(shop.stock_of(product.id).await, 5);

    let receipt = shop
        .services
        .checkout()
        .pay(alice, order.order.id, None)
        .await
        .unwrap();
    assert_eq!(receipt.status, OrderStatus::Paid);
    assert_eq!(receipt.payment_method, "MockPay");
    assert_eq!(receipt.message, "Payment successful");
    assert!(!receipt.transaction_id.is_empty());
    assert_eq!(shop.stock_of(product.id).await, 3);

    let stored = shop
        .services
        .orders()
        .get_order(alice, order.order.id)
        .await
        .unwrap();
    assert_eq!(stored.order.status, OrderStatus::Paid);
    assert_eq!(stored.order.payment_method.as_deref(), Some("MockPay"));
    assert_eq!(
        stored.order.transaction_id.as_deref(),
        Some(receipt.transaction_id.as_str())
    );
}

#[tokio::test]
async fn test_order_keeps_checkout_price() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    shop.address(alice, "Alice", true).await;
    shop.services.carts().add_item(alice, lamp.id, 2).await.unwrap();
    let order = shop.services.checkout().checkout(alice, None).await.unwrap();

    shop.services
        .catalog()
        .update_product(
            shop.admin,
            lamp.id,
            ProductChanges {
                price: Some(Decimal::from(99)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = shop
        .services
        .orders()
        .get_order(alice, order.order.id)
        .await
        .unwrap();
    assert_eq!(stored.order.total, Decimal::from(20));
    assert_eq!(stored.items[0].price, Decimal::from(10));
}

#[tokio::test]
async fn test_paying_twice_fails_and_decrements_once() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    shop.address(alice, "Alice", true).await;
    shop.services.carts().add_item(alice, lamp.id, 2).await.unwrap();
    let order = shop.services.checkout().checkout(alice, None).await.unwrap();

    let checkout = shop.services.checkout();
    checkout
        .pay(alice, order.order.id, Some("Card".to_string()))
        .await
        .unwrap();
    let second = checkout.pay(alice, order.order.id, None).await;

    assert!(matches!(second, Err(AppError::NotPending)));
    assert_eq!(shop.stock_of(lamp.id).await, 3);

    let stored = shop
        .services
        .orders()
        .get_order(alice, order.order.id)
        .await
        .unwrap();
    assert_eq!(stored.order.payment_method.as_deref(), Some("Card"));
}

#[tokio::test]
async fn test_payment_is_atomic_when_stock_runs_out() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let bulb = shop.product("Bulb", 2, 1).await;
    shop.address(alice, "Alice", true).await;
    shop.services.carts().add_item(alice, lamp.id, 2).await.unwrap();
    shop.services.carts().add_item(alice, bulb.id, 1).await.unwrap();
    let order = shop.services.checkout().checkout(alice, None).await.unwrap();
    assert_eq!(order.order.total, Decimal::from(22));

    // Someone else bought the last bulb in the meantime
    shop.services
        .catalog()
        .update_product(
            shop.admin,
            bulb.id,
            ProductChanges {
                stock: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let result = shop.services.checkout().pay(alice, order.order.id, None).await;
    match result {
        Err(AppError::InsufficientStock {
            product_id,
            available,
            ..
        }) => {
            assert_eq!(product_id, bulb.id);
            assert_eq!(available, 0);
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }

    assert_eq!(shop.stock_of(lamp.id).await, 5);
    let stored = shop
        .services
        .orders()
        .get_order(alice, order.order.id)
        .await
        .unwrap();
    assert_eq!(stored.order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_only_owner_can_pay() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    shop.address(alice, "Alice", true).await;
    shop.services.carts().add_item(alice, lamp.id, 1).await.unwrap();
    let order = shop.services.checkout().checkout(alice, None).await.unwrap();

    let result = shop
        .services
        .checkout()
        .pay(customer(), order.order.id, None)
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
    assert_eq!(shop.stock_of(lamp.id).await, 5);
}

#[tokio::test]
async fn test_clear_and_remove_empty_the_cart() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let mug = shop.product("Mug", 4, 5).await;
    let carts = shop.services.carts();

    let line = carts.add_item(alice, lamp.id, 1).await.unwrap();
    carts.add_item(alice, mug.id, 2).await.unwrap();

    carts.remove_item(alice, line.id).await.unwrap();
    let cart = carts.get_cart(alice).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, Decimal::from(8));

    carts.clear_cart(alice).await.unwrap();
    let cart = carts.get_cart(alice).await.unwrap();
    assert!(cart.items.is_empty());

    let result = carts.remove_item(alice, line.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_huge_quantity_on_existing_line_is_insufficient_stock() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let carts = shop.services.carts();

    let line = carts.add_item(alice, lamp.id, 2).await.unwrap();

    let result = carts.add_item(alice, lamp.id, i32::MAX).await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

    let result = carts
        .update_item(
            alice,
            line.id,
            CartItemUpdate {
                quantity: Some(i32::MAX),
                product_id: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

    let cart = carts.get_cart(alice).await.unwrap();
    assert_eq!(cart.items[0].quantity, 2);
}

#[tokio::test]
async fn test_update_item_checks_stock() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let carts = shop.services.carts();

    let line = carts.add_item(alice, lamp.id, 1).await.unwrap();

    let result = carts
        .update_item(
            alice,
            line.id,
            CartItemUpdate {
                quantity: Some(6),
                product_id: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

    let updated = carts
        .update_item(
            alice,
            line.id,
            CartItemUpdate {
                quantity: Some(5),
                product_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, line.id);
    assert_eq!(updated.quantity, 5);

    let cart = carts.get_cart(alice).await.unwrap();
    assert_eq!(cart.total, Decimal::from(50));
}

#[tokio::test]
async fn test_update_item_switches_product() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let mug = shop.product("Mug", 4, 1).await;
    let carts = shop.services.carts();

    let line = carts.add_item(alice, lamp.id, 3).await.unwrap();

    // Stock is checked against the new product with the kept quantity
    let result = carts
        .update_item(
            alice,
            line.id,
            CartItemUpdate {
                quantity: None,
                product_id: Some(mug.id),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

    let switched = carts
        .update_item(
            alice,
            line.id,
            CartItemUpdate {
                quantity: Some(1),
                product_id: Some(mug.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(switched.id, line.id);
    assert_eq!(switched.product.id, mug.id);

    let cart = carts.get_cart(alice).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, Decimal::from(4));
}

#[tokio::test]
async fn test_update_item_merges_into_existing_line() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let mug = shop.product("Mug", 4, 5).await;
    let carts = shop.services.carts();

    let lamp_line = carts.add_item(alice, lamp.id, 3).await.unwrap();
    let mug_line = carts.add_item(alice, mug.id, 2).await.unwrap();

    // 2 mugs already in the cart plus 4 more exceeds the 5 in stock
    let result = carts
        .update_item(
            alice,
            lamp_line.id,
            CartItemUpdate {
                quantity: Some(4),
                product_id: Some(mug.id),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));
    assert_eq!(carts.get_cart(alice).await.unwrap().items.len(), 2);

    let merged = carts
        .update_item(
            alice,
            lamp_line.id,
            CartItemUpdate {
                quantity: Some(3),
                product_id: Some(mug.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(merged.id, mug_line.id);
    assert_eq!(merged.quantity, 5);

    let cart = carts.get_cart(alice).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product.id, mug.id);
    assert_eq!(cart.total, Decimal::from(20));
}

#[tokio::test]
async fn test_update_foreign_item_not_found() {
    let shop = TestShop::new().await;
    let alice = customer();
    let bob = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let carts = shop.services.carts();

    let line = carts.add_item(alice, lamp.id, 1).await.unwrap();
    let update = CartItemUpdate {
        quantity: Some(2),
        product_id: None,
    };

    // Bob without a cart, then with one of his own
    let result = carts.update_item(bob, line.id, update).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    carts.add_item(bob, lamp.id, 1).await.unwrap();
    let result = carts.update_item(bob, line.id, update).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    let cart = carts.get_cart(alice).await.unwrap();
    assert_eq!(cart.items[0].quantity, 1);
}

#[tokio::test]
async fn test_deleting_ordered_product_keeps_order_intact() {
    let shop = TestShop::new().await;
    let alice = customer();
    let lamp = shop.product("Lamp", 10, 5).await;
    let mug = shop.product("Mug", 5, 5).await;
    let spare = shop.product("Spare", 1, 1).await;
    shop.address(alice, "Alice", true).await;

    let carts = shop.services.carts();
    carts.add_item(alice, lamp.id, 2).await.unwrap();
    carts.add_item(alice, mug.id, 1).await.unwrap();

    let order = shop.services.checkout().checkout(alice, None).await.unwrap();
    shop.services
        .checkout()
        .pay(alice, order.order.id, None)
        .await
        .unwrap();

    let catalog = shop.services.catalog();
    let result = catalog.delete_product(shop.admin, lamp.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let kept = shop
        .services
        .orders()
        .get_order(alice, order.order.id)
        .await
        .unwrap();
    assert_eq!(kept.items.len(), 2);
    assert_eq!(kept.order.total, Decimal::from(25));
    assert_eq!(kept.order.status, OrderStatus::Paid);
    assert!(catalog.get_product(lamp.id).await.is_ok());

    // Products never ordered can still go
    catalog.delete_product(shop.admin, spare.id).await.unwrap();
    assert!(matches!(
        catalog.get_product(spare.id).await,
        Err(AppError::NotFound)
    ));
}
