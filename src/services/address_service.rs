//! Address service - The caller's address book.
//!
//! Every change that can touch the default flag locks the owner's
//! address rows first, then clears and sets the flag in the same
//! transaction, so a user never ends up with two defaults.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{ensure_access, ensure_owner, Address, AddressFields, AddressPatch, Caller};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Address service trait for dependency injection.
#[async_trait]
pub trait AddressService: Send + Sync {
    async fn list_addresses(&self, caller: Caller) -> AppResult<Vec<Address>>;

    async fn get_address(&self, caller: Caller, id: Uuid) -> AppResult<Address>;

    async fn create_address(&self, caller: Caller, fields: AddressFields) -> AppResult<Address>;

    /// Replace every field (PUT)
    async fn update_address(
        &self,
        caller: Caller,
        id: Uuid,
        fields: AddressFields,
    ) -> AppResult<Address>;

    /// Replace only the supplied fields (PATCH)
    async fn patch_address(
        &self,
        caller: Caller,
        id: Uuid,
        patch: AddressPatch,
    ) -> AppResult<Address>;

    async fn delete_address(&self, caller: Caller, id: Uuid) -> AppResult<()>;

    /// Make `id` the caller's only default address
    async fn set_default(&self, caller: Caller, id: Uuid) -> AppResult<Address>;
}

pub struct AddressManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AddressManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Lock the owner's rows, apply `change` to address `id` and save it.
    async fn edit<E>(&self, caller: Caller, id: Uuid, change: E) -> AppResult<Address>
    where
        E: FnOnce(&mut Address) + Send + 'static,
    {
        with_transaction!(self.uow, |ctx| {
            let addresses = ctx.addresses();

            let locked = addresses.lock_for_user(caller.user_id).await?;
            let mut address = locked
                .into_iter()
                .find(|a| a.id == id)
                .ok_or(AppError::NotFound)?;
            // Scoped to the caller even for administrators
            address = ensure_owner(&caller, address)?;

            change(&mut address);
            if address.is_default {
                addresses.clear_defaults(address.user_id).await?;
            }

            addresses.save(address).await
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AddressService for AddressManager<U> {
    async fn list_addresses(&self, caller: Caller) -> AppResult<Vec<Address>> {
        self.uow.addresses().list_for_user(caller.user_id).await
    }

    async fn get_address(&self, caller: Caller, id: Uuid) -> AppResult<Address> {
        let address = self.uow.addresses().find_by_id(id).await?.ok_or_not_found()?;
        ensure_access(&caller, address)
    }

    async fn create_address(&self, caller: Caller, fields: AddressFields) -> AppResult<Address> {
        let user_id = caller.user_id;

        let address = with_transaction!(self.uow, |ctx| {
            let addresses = ctx.addresses();
            addresses.lock_for_user(user_id).await?;

            if fields.is_default {
                addresses.clear_defaults(user_id).await?;
            }
            addresses.insert(user_id, fields).await
        })?;

        tracing::info!(user_id = %user_id, address_id = %address.id, "Address created");
        Ok(address)
    }

    async fn update_address(
        &self,
        caller: Caller,
        id: Uuid,
        fields: AddressFields,
    ) -> AppResult<Address> {
        self.edit(caller, id, move |address| address.apply(fields))
            .await
    }

    async fn patch_address(
        &self,
        caller: Caller,
        id: Uuid,
        patch: AddressPatch,
    ) -> AppResult<Address> {
        self.edit(caller, id, move |address| address.apply_patch(patch))
            .await
    }

    async fn delete_address(&self, caller: Caller, id: Uuid) -> AppResult<()> {
        let address = self.uow.addresses().find_by_id(id).await?.ok_or_not_found()?;
        let address = ensure_owner(&caller, address)?;

        self.uow.addresses().delete(address.id).await
    }

    async fn set_default(&self, caller: Caller, id: Uuid) -> AppResult<Address> {
        let address = self
            .edit(caller, id, |address| address.is_default = true)
            .await?;

        tracing::info!(user_id = %caller.user_id, address_id = %id, "Default address changed");
        Ok(address)
    }
}
