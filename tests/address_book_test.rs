//! Address book against a real (SQLite) database.

mod common;

use common::{address_fields, customer, TestShop};
use shop_api::domain::{Address, AddressPatch};
use shop_api::errors::AppError;
use shop_api::services::ServiceContainer;

fn defaults(addresses: &[Address]) -> Vec<&str> {
    addresses
        .iter()
        .filter(|a| a.is_default)
        .map(|a| a.full_name.as_str())
        .collect()
}

#[tokio::test]
async fn test_new_default_replaces_old_default() {
    let shop = TestShop::new().await;
    let alice = customer();

    shop.address(alice, "Home", true).await;
    shop.address(alice, "Work", true).await;

    let addresses = shop.services.addresses().list_addresses(alice).await.unwrap();
    assert_eq!(addresses.len(), 2);
    assert_eq!(defaults(&addresses), vec!["Work"]);
}

#[tokio::test]
async fn test_set_default_leaves_exactly_one() {
    let shop = TestShop::new().await;
    let alice = customer();
    let book = shop.services.addresses();

    let home = shop.address(alice, "Home", true).await;
    let work = shop.address(alice, "Work", false).await;
    shop.address(alice, "Cabin", false).await;

    let updated = book.set_default(alice, work.id).await.unwrap();
    assert!(updated.is_default);
    assert_eq!(defaults(&book.list_addresses(alice).await.unwrap()), vec!["Work"]);

    book.set_default(alice, home.id).await.unwrap();
    assert_eq!(defaults(&book.list_addresses(alice).await.unwrap()), vec!["Home"]);

    // Setting the current default again is a no-op
    book.set_default(alice, home.id).await.unwrap();
    assert_eq!(defaults(&book.list_addresses(alice).await.unwrap()), vec!["Home"]);
}

#[tokio::test]
async fn test_patch_and_put_respect_single_default() {
    let shop = TestShop::new().await;
    let alice = customer();
    let book = shop.services.addresses();

    shop.address(alice, "Home", true).await;
    let work = shop.address(alice, "Work", false).await;

    let patched = book
        .patch_address(
            alice,
            work.id,
            AddressPatch {
                is_default: Some(true),
                city: Some("Shelbyville".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.city, "Shelbyville");
    assert_eq!(patched.street, "1 Main St");
    assert_eq!(defaults(&book.list_addresses(alice).await.unwrap()), vec!["Work"]);

    let mut fields = address_fields("Home", true);
    fields.street = "2 Elm St".to_string();
    let home = book.list_addresses(alice).await.unwrap();
    let home = home.iter().find(|a| a.full_name == "Home").unwrap();
    let replaced = book.update_address(alice, home.id, fields).await.unwrap();
    assert_eq!(replaced.street, "2 Elm St");
    assert_eq!(defaults(&book.list_addresses(alice).await.unwrap()), vec!["Home"]);
}

#[tokio::test]
async fn test_defaults_are_per_user() {
    let shop = TestShop::new().await;
    let alice = customer();
    let bob = customer();

    shop.address(alice, "Alice", true).await;
    shop.address(bob, "Bob", true).await;

    let book = shop.services.addresses();
    assert_eq!(defaults(&book.list_addresses(alice).await.unwrap()), vec!["Alice"]);
    assert_eq!(defaults(&book.list_addresses(bob).await.unwrap()), vec!["Bob"]);
}

#[tokio::test]
async fn test_foreign_addresses_are_hidden() {
    let shop = TestShop::new().await;
    let alice = customer();
    let bob = customer();
    let book = shop.services.addresses();
    let home = shop.address(alice, "Home", false).await;

    assert!(matches!(
        book.get_address(bob, home.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        book.set_default(bob, home.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        book.delete_address(bob, home.id).await,
        Err(AppError::NotFound)
    ));

    book.delete_address(alice, home.id).await.unwrap();
    assert!(book.list_addresses(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_address_is_owner_only() {
    let shop = TestShop::new().await;
    let alice = customer();
    let book = shop.services.addresses();

    let home = shop.address(alice, "Home", true).await;
    let work = shop.address(alice, "Work", false).await;

    let result = book.delete_address(customer(), home.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    // Administrators may read but not remove another user's address
    let result = book.delete_address(shop.admin, home.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    book.delete_address(alice, home.id).await.unwrap();
    let addresses = book.list_addresses(alice).await.unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].id, work.id);

    let result = book.get_address(alice, home.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    let result = book.delete_address(alice, home.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}
