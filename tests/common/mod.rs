//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database with all
//! migrations applied, wired through the real service container.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use shop_api::config::{Config, ROLE_ADMIN, ROLE_USER};
use shop_api::domain::{Address, AddressFields, Caller, NewProduct, Product};
use shop_api::infra::Migrator;
use shop_api::services::{Claims, ServiceContainer, Services};

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Fresh single-connection in-memory database with no tables yet.
pub async fn connect_empty() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    sea_orm::Database::connect(options)
        .await
        .expect("open sqlite")
}

/// Fresh single-connection in-memory database with the schema applied.
pub async fn connect() -> DatabaseConnection {
    let db = connect_empty().await;
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub fn test_config() -> Config {
    Config::new("sqlite::memory:", JWT_SECRET)
}

pub struct TestShop {
    pub db: DatabaseConnection,
    pub services: Services,
    pub admin: Caller,
}

impl TestShop {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = connect().await;
        let services = Services::from_connection(db.clone(), &config);
        Self {
            db,
            services,
            admin: Caller::admin(Uuid::new_v4()),
        }
    }

    /// Product with a whole-number price.
    pub async fn product(&self, name: &str, price: i64, stock: i32) -> Product {
        self.services
            .catalog()
            .create_product(
                self.admin,
                NewProduct {
                    name: name.to_string(),
                    description: String::new(),
                    price: Decimal::from(price),
                    stock,
                    category_id: None,
                },
            )
            .await
            .expect("create product")
    }

    pub async fn stock_of(&self, product_id: Uuid) -> i32 {
        self.services
            .catalog()
            .get_product(product_id)
            .await
            .expect("product exists")
            .product
            .stock
    }

    pub async fn address(&self, caller: Caller, name: &str, is_default: bool) -> Address {
        self.services
            .addresses()
            .create_address(caller, address_fields(name, is_default))
            .await
            .expect("create address")
    }
}

pub fn address_fields(name: &str, is_default: bool) -> AddressFields {
    AddressFields {
        full_name: name.to_string(),
        phone: "+1 555 0100".to_string(),
        street: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
        is_default,
    }
}

pub fn customer() -> Caller {
    Caller::user(Uuid::new_v4())
}

/// Bearer token signed the way the identity provider signs them.
pub fn token_for(caller: &Caller) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: caller.user_id,
        role: if caller.is_admin { ROLE_ADMIN } else { ROLE_USER }.to_string(),
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("sign token")
}
