//! Wishlist item database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::WishlistItem;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wishlist_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub added_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for WishlistItem {
    fn from(model: Model) -> Self {
        WishlistItem {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            added_at: model.added_at,
        }
    }
}
