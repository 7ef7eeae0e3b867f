//! Address book entities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::caller::Owned;

/// Shipping address owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "+1 555 0100")]
    pub phone: String,
    #[schema(example = "1 Main St")]
    pub street: String,
    #[schema(example = "Springfield")]
    pub city: String,
    #[schema(example = "IL")]
    pub state: String,
    #[schema(example = "62701")]
    pub postal_code: String,
    #[schema(example = "US")]
    pub country: String,
    pub is_default: bool,
}

impl Address {
    /// Free-text form stored on orders at checkout.
    pub fn shipping_label(&self) -> String {
        format!(
            "{}, {}, {}, {} {}, {}",
            self.full_name, self.street, self.city, self.state, self.postal_code, self.country
        )
    }

    /// Overwrite every editable field.
    pub fn apply(&mut self, fields: AddressFields) {
        self.full_name = fields.full_name;
        self.phone = fields.phone;
        self.street = fields.street;
        self.city = fields.city;
        self.state = fields.state;
        self.postal_code = fields.postal_code;
        self.country = fields.country;
        self.is_default = fields.is_default;
    }

    /// Overwrite only the fields present in `patch`.
    pub fn apply_patch(&mut self, patch: AddressPatch) {
        if let Some(v) = patch.full_name {
            self.full_name = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.street {
            self.street = v;
        }
        if let Some(v) = patch.city {
            self.city = v;
        }
        if let Some(v) = patch.state {
            self.state = v;
        }
        if let Some(v) = patch.postal_code {
            self.postal_code = v;
        }
        if let Some(v) = patch.country {
            self.country = v;
        }
        if let Some(v) = patch.is_default {
            self.is_default = v;
        }
    }
}

impl Owned for Address {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Complete set of editable address fields
#[derive(Debug, Clone, Default)]
pub struct AddressFields {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Partial address update
#[derive(Debug, Clone, Default)]
pub struct AddressPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: "Jane Doe".to_string(),
            phone: "555".to_string(),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: "US".to_string(),
            is_default: false,
        }
    }

    #[test]
    fn test_shipping_label() {
        assert_eq!(
            address().shipping_label(),
            "Jane Doe, 1 Main St, Springfield, IL 62701, US"
        );
    }

    #[test]
    fn test_apply_patch_keeps_missing_fields() {
        let mut addr = address();
        addr.apply_patch(AddressPatch {
            city: Some("Shelbyville".to_string()),
            ..Default::default()
        });

        assert_eq!(addr.city, "Shelbyville");
        assert_eq!(addr.street, "1 Main St");
        assert!(!addr.is_default);
    }
}
