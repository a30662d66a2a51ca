//! Order domain events exchanged with the order service.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer-facing view of an order.
///
/// Inbound (inside [`CreateOrderEvent`]) the `key` is absent and any
/// `date_time_of_submission` is ignored: the service assigns both. Outbound
/// views always carry both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    /// Order identifier, assigned by the service.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key: Option<Uuid>,
    /// Submission instant, stamped by the service clock.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_time_of_submission: Option<DateTime<Utc>>,
    /// Customer name.
    pub name: String,
    /// First address line.
    pub address1: String,
    /// Postal code.
    pub postcode: String,
    /// Menu item identifier -> requested quantity.
    #[serde(default)]
    pub order_items: HashMap<String, u32>,
}

impl OrderDetails {
    /// Builds an inbound order payload for the given customer.
    #[must_use]
    pub fn for_customer(
        name: impl Into<String>,
        address1: impl Into<String>,
        postcode: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address1: address1.into(),
            postcode: postcode.into(),
            ..Self::default()
        }
    }

    /// Adds (or replaces) a line item. Chainable.
    #[must_use]
    pub fn with_item(mut self, menu_item_id: impl Into<String>, quantity: u32) -> Self {
        self.order_items.insert(menu_item_id.into(), quantity);
        self
    }

    /// Total number of portions across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.order_items.values().map(|q| u64::from(*q)).sum()
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderEvent {
    pub details: OrderDetails,
}

impl CreateOrderEvent {
    #[must_use]
    pub fn new(details: OrderDetails) -> Self {
        Self { details }
    }
}

/// Response to [`CreateOrderEvent`]: the freshly issued key and the stored view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedEvent {
    pub new_order_key: Uuid,
    pub details: OrderDetails,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOrderStatusEvent {
    pub order_id: Uuid,
}

/// Response to [`RequestOrderStatusEvent`].
///
/// `found == false` means the identifier is unknown; it is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusEvent {
    pub order_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status_date: Option<DateTime<Utc>>,
    pub found: bool,
}

impl OrderStatusEvent {
    #[must_use]
    pub fn found(order_id: Uuid, status: String, status_date: DateTime<Utc>) -> Self {
        Self {
            order_id,
            status: Some(status),
            status_date: Some(status_date),
            found: true,
        }
    }

    #[must_use]
    pub fn not_found(order_id: Uuid) -> Self {
        Self {
            order_id,
            status: None,
            status_date: None,
            found: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Listing and lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAllOrdersEvent {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllOrdersEvent {
    pub orders_details: Vec<OrderDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOrderDetailsEvent {
    pub key: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsEvent {
    pub key: Uuid,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<OrderDetails>,
    pub found: bool,
}

impl OrderDetailsEvent {
    #[must_use]
    pub fn new(key: Uuid, details: Option<OrderDetails>) -> Self {
        let found = details.is_some();
        Self {
            key,
            details,
            found,
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrderEvent {
    pub key: Uuid,
}

/// Response to [`DeleteOrderEvent`]. Deleting an unknown key reports
/// `deletion_completed == false` and is otherwise a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDeletedEvent {
    pub key: Uuid,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<OrderDetails>,
    pub deletion_completed: bool,
}
