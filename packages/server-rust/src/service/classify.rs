//! Message classification: turns inbound `Message` requests into `Operation`s.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use noodlebar_core::messages::Message;
use noodlebar_core::ClockSource;

use super::operation::{service_names, ClassifyError, Operation, OperationContext};

/// Classifies request messages and tags each with a fresh context.
///
/// Menu requests route to `"menu"`, every order request to `"orders"`.
/// Response variants travel server-to-client only and are rejected.
pub struct MessageClassifier {
    clock: Arc<dyn ClockSource>,
    call_id_counter: AtomicU64,
}

impl MessageClassifier {
    #[must_use]
    pub fn new(clock: Arc<dyn ClockSource>) -> Self {
        Self {
            clock,
            call_id_counter: AtomicU64::new(1),
        }
    }

    fn make_ctx(&self, service_name: &'static str, client_id: Option<String>) -> OperationContext {
        let call_id = self.call_id_counter.fetch_add(1, Ordering::Relaxed);
        let mut ctx = OperationContext::new(call_id, service_name, self.clock.now());
        ctx.client_id = client_id;
        ctx
    }

    /// Classify a `Message` into an `Operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::ServerToClient`] for response messages.
    pub fn classify(
        &self,
        msg: Message,
        client_id: Option<String>,
    ) -> Result<Operation, ClassifyError> {
        match msg {
            Message::RequestAllMenuItems { payload } => Ok(Operation::RequestAllMenuItems {
                ctx: self.make_ctx(service_names::MENU, client_id),
                payload,
            }),
            Message::CreateOrder { payload } => Ok(Operation::CreateOrder {
                ctx: self.make_ctx(service_names::ORDERS, client_id),
                payload,
            }),
            Message::RequestOrderStatus { payload } => Ok(Operation::RequestOrderStatus {
                ctx: self.make_ctx(service_names::ORDERS, client_id),
                payload,
            }),
            Message::RequestAllOrders { payload } => Ok(Operation::RequestAllOrders {
                ctx: self.make_ctx(service_names::ORDERS, client_id),
                payload,
            }),
            Message::RequestOrderDetails { payload } => Ok(Operation::RequestOrderDetails {
                ctx: self.make_ctx(service_names::ORDERS, client_id),
                payload,
            }),
            Message::DeleteOrder { payload } => Ok(Operation::DeleteOrder {
                ctx: self.make_ctx(service_names::ORDERS, client_id),
                payload,
            }),

            // ----- Server-to-client responses -----
            Message::AllMenuItems { .. }
            | Message::OrderCreated { .. }
            | Message::OrderStatus { .. }
            | Message::AllOrders { .. }
            | Message::OrderDetails { .. }
            | Message::OrderDeleted { .. } => Err(ClassifyError::ServerToClient {
                variant: msg.type_name(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
