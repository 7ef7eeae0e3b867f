//! Address repository.
//!
//! Writes that touch the default flag run through the transactional
//! address repository so the user's rows can be locked first.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::address::{self, Entity as AddressEntity};
use crate::domain::Address;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Address repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>>;

    /// A user's addresses, default first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Address>>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of AddressRepository
pub struct AddressStore {
    db: DatabaseConnection,
}

impl AddressStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressRepository for AddressStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>> {
        let result = AddressEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Address::from))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Address>> {
        let models = AddressEntity::find()
            .filter(address::Column::UserId.eq(user_id))
            .order_by_desc(address::Column::IsDefault)
            .order_by_asc(address::Column::FullName)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Address::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = AddressEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
