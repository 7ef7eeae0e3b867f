//! Order ledger entities and the order status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::caller::Owned;
use super::cart::CartLine;
use crate::errors::{AppError, AppResult};

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses an administrator may set explicitly
    pub const ADMIN_TARGETS: [OrderStatus; 4] = [
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse a status an administrator asked for.
    ///
    /// `PENDING` and unknown values are rejected with `InvalidStatus`.
    pub fn parse_admin_target(value: &str) -> AppResult<Self> {
        value
            .parse::<OrderStatus>()
            .ok()
            .filter(|status| Self::ADMIN_TARGETS.contains(status))
            .ok_or_else(|| AppError::InvalidStatus(value.to_string()))
    }

    /// Forward-only lifecycle graph.
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Pending, Cancelled)
                | (Paid, Shipped)
                | (Paid, Cancelled)
                | (Shipped, Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }
}

/// Policy applied to administrator status updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any administrator target is reachable from any status
    Permissive,
    /// Only [`OrderStatus::can_advance_to`] moves are accepted
    ForwardOnly,
}

impl TransitionPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            TransitionPolicy::ForwardOnly
        } else {
            TransitionPolicy::Permissive
        }
    }

    pub fn check(&self, from: OrderStatus, to: OrderStatus) -> AppResult<()> {
        match self {
            TransitionPolicy::Permissive => Ok(()),
            TransitionPolicy::ForwardOnly if from.can_advance_to(to) => Ok(()),
            TransitionPolicy::ForwardOnly => Err(AppError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

/// Order header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    /// Sum of snapshotted item subtotals
    #[schema(value_type = String, example = "20.00")]
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    /// Address text captured at checkout
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Order {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Ordered product with its price frozen at order creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(value_type = String, example = "10.00")]
    pub price: Decimal,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order line about to be written, price already frozen
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

impl NewOrderItem {
    /// Freeze the cart line's current product price.
    pub fn snapshot(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            quantity: line.quantity,
            price: line.product.price,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Sum of snapshot price × quantity.
pub fn order_total(items: &[NewOrderItem]) -> Decimal {
    items.iter().map(NewOrderItem::subtotal).sum()
}

/// Order with its items
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl Owned for OrderDetail {
    fn owner_id(&self) -> Uuid {
        self.order.user_id
    }
}

/// Result of a successful payment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentReceipt {
    #[schema(example = "Payment successful")]
    pub message: String,
    pub order_id: Uuid,
    pub status: OrderStatus,
    #[schema(example = "MockPay")]
    pub payment_method: String,
    pub transaction_id: String,
}

/// Result of an administrator status update
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusChange {
    #[schema(example = "Order status updated to SHIPPED")]
    pub message: String,
    pub order_id: Uuid,
    pub status: OrderStatus,
}
