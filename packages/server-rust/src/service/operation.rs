//! Typed operations flowing through the service pipeline.

use chrono::{DateTime, Utc};
use noodlebar_core::messages::{
    CreateOrderEvent, DeleteOrderEvent, Message, RequestAllMenuItemsEvent, RequestAllOrdersEvent,
    RequestOrderDetailsEvent, RequestOrderStatusEvent,
};

use super::domain::DomainError;

/// Well-known service names used for routing.
pub mod service_names {
    pub const MENU: &str = "menu";
    pub const ORDERS: &str = "orders";
}

/// Context carried with every operation through the pipeline.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Process-unique id of this call, for log correlation.
    pub call_id: u64,
    /// Name of the service that handles this operation.
    pub service_name: &'static str,
    /// Opaque caller identity (session id, user name) if the boundary knows it.
    pub client_id: Option<String>,
    /// When the operation was classified.
    pub received_at: DateTime<Utc>,
}

impl OperationContext {
    #[must_use]
    pub fn new(call_id: u64, service_name: &'static str, received_at: DateTime<Utc>) -> Self {
        Self {
            call_id,
            service_name,
            client_id: None,
            received_at,
        }
    }
}

/// Request variants dispatched to the domain services.
#[derive(Debug)]
pub enum Operation {
    RequestAllMenuItems {
        ctx: OperationContext,
        payload: RequestAllMenuItemsEvent,
    },
    CreateOrder {
        ctx: OperationContext,
        payload: CreateOrderEvent,
    },
    RequestOrderStatus {
        ctx: OperationContext,
        payload: RequestOrderStatusEvent,
    },
    RequestAllOrders {
        ctx: OperationContext,
        payload: RequestAllOrdersEvent,
    },
    RequestOrderDetails {
        ctx: OperationContext,
        payload: RequestOrderDetailsEvent,
    },
    DeleteOrder {
        ctx: OperationContext,
        payload: DeleteOrderEvent,
    },
}

impl Operation {
    #[must_use]
    pub fn ctx(&self) -> &OperationContext {
        match self {
            Self::RequestAllMenuItems { ctx, .. }
            | Self::CreateOrder { ctx, .. }
            | Self::RequestOrderStatus { ctx, .. }
            | Self::RequestAllOrders { ctx, .. }
            | Self::RequestOrderDetails { ctx, .. }
            | Self::DeleteOrder { ctx, .. } => ctx,
        }
    }

    /// Short variant name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestAllMenuItems { .. } => "request_all_menu_items",
            Self::CreateOrder { .. } => "create_order",
            Self::RequestOrderStatus { .. } => "request_order_status",
            Self::RequestAllOrders { .. } => "request_all_orders",
            Self::RequestOrderDetails { .. } => "request_order_details",
            Self::DeleteOrder { .. } => "delete_order",
        }
    }
}

/// Successful response from an operation handler.
#[derive(Debug)]
pub enum OperationResponse {
    Message(Box<Message>),
}

impl OperationResponse {
    #[must_use]
    pub fn message(msg: Message) -> Self {
        Self::Message(Box::new(msg))
    }

    #[must_use]
    pub fn into_message(self) -> Message {
        match self {
            Self::Message(msg) => *msg,
        }
    }
}

/// Errors returned by operation handlers.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("unknown service: {name}")]
    UnknownService { name: String },
    #[error("operation {operation} cannot be handled by service {service}")]
    WrongService {
        service: &'static str,
        operation: &'static str,
    },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Errors from classifying a `Message` into an `Operation`.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("server-to-client response cannot be classified as operation: {variant}")]
    ServerToClient { variant: &'static str },
}
