//! Event contracts exchanged between the presentation tier and the service layer.
//!
//! Each submodule holds the request/response payloads for one domain. The
//! [`Message`] enum wraps every payload in a `type`-tagged envelope so a single
//! frame format can carry any of them. Frames are named `MsgPack`
//! (`rmp_serde::to_vec_named()`) with camelCase field names.

pub mod menu;
pub mod orders;

use serde::{Deserialize, Serialize};

pub use menu::{AllMenuItemsEvent, MenuItemDetails, RequestAllMenuItemsEvent};
pub use orders::{
    AllOrdersEvent, CreateOrderEvent, DeleteOrderEvent, OrderCreatedEvent, OrderDeletedEvent,
    OrderDetails, OrderDetailsEvent, OrderStatusEvent, RequestAllOrdersEvent,
    RequestOrderDetailsEvent, RequestOrderStatusEvent,
};

// ---------------------------------------------------------------------------
// Message envelope
// ---------------------------------------------------------------------------

/// Tagged envelope for every event the service layer accepts or returns.
///
/// Variants are payload-wrapped: the event sits under a `payload` key next to
/// the `type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    // ----- Requests -----
    #[serde(rename = "REQUEST_ALL_MENU_ITEMS")]
    RequestAllMenuItems { payload: RequestAllMenuItemsEvent },

    #[serde(rename = "CREATE_ORDER")]
    CreateOrder { payload: CreateOrderEvent },

    #[serde(rename = "REQUEST_ORDER_STATUS")]
    RequestOrderStatus { payload: RequestOrderStatusEvent },

    #[serde(rename = "REQUEST_ALL_ORDERS")]
    RequestAllOrders { payload: RequestAllOrdersEvent },

    #[serde(rename = "REQUEST_ORDER_DETAILS")]
    RequestOrderDetails { payload: RequestOrderDetailsEvent },

    #[serde(rename = "DELETE_ORDER")]
    DeleteOrder { payload: DeleteOrderEvent },

    // ----- Responses -----
    #[serde(rename = "ALL_MENU_ITEMS")]
    AllMenuItems { payload: AllMenuItemsEvent },

    #[serde(rename = "ORDER_CREATED")]
    OrderCreated { payload: OrderCreatedEvent },

    #[serde(rename = "ORDER_STATUS")]
    OrderStatus { payload: OrderStatusEvent },

    #[serde(rename = "ALL_ORDERS")]
    AllOrders { payload: AllOrdersEvent },

    #[serde(rename = "ORDER_DETAILS")]
    OrderDetails { payload: OrderDetailsEvent },

    #[serde(rename = "ORDER_DELETED")]
    OrderDeleted { payload: OrderDeletedEvent },
}

impl Message {
    /// Wire discriminator of this variant, matching the serialized `type` field.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RequestAllMenuItems { .. } => "REQUEST_ALL_MENU_ITEMS",
            Self::CreateOrder { .. } => "CREATE_ORDER",
            Self::RequestOrderStatus { .. } => "REQUEST_ORDER_STATUS",
            Self::RequestAllOrders { .. } => "REQUEST_ALL_ORDERS",
            Self::RequestOrderDetails { .. } => "REQUEST_ORDER_DETAILS",
            Self::DeleteOrder { .. } => "DELETE_ORDER",
            Self::AllMenuItems { .. } => "ALL_MENU_ITEMS",
            Self::OrderCreated { .. } => "ORDER_CREATED",
            Self::OrderStatus { .. } => "ORDER_STATUS",
            Self::AllOrders { .. } => "ALL_ORDERS",
            Self::OrderDetails { .. } => "ORDER_DETAILS",
            Self::OrderDeleted { .. } => "ORDER_DELETED",
        }
    }

    /// Returns `true` for messages the service layer sends back to callers.
    #[must_use]
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Self::AllMenuItems { .. }
                | Self::OrderCreated { .. }
                | Self::OrderStatus { .. }
                | Self::AllOrders { .. }
                | Self::OrderDetails { .. }
                | Self::OrderDeleted { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Errors from encoding or decoding a [`Message`] frame.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode message: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode message: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Encodes a message as named `MsgPack`.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode(msg: &Message) -> Result<Vec<u8>, CodecError> {
    Ok(rmp_serde::to_vec_named(msg)?)
}

/// Decodes a named `MsgPack` frame into a message.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for truncated frames, unknown `type` tags,
/// or payloads that do not match the tagged variant.
pub fn decode(bytes: &[u8]) -> Result<Message, CodecError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
