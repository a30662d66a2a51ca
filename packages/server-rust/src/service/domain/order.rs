//! Order creation, status, listing, lookup, and deletion.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use dashmap::DashSet;
use noodlebar_core::messages::{
    AllOrdersEvent, CreateOrderEvent, DeleteOrderEvent, Message, OrderCreatedEvent,
    OrderDeletedEvent, OrderDetailsEvent, OrderStatusEvent, RequestAllOrdersEvent,
    RequestOrderDetailsEvent, RequestOrderStatusEvent,
};
use noodlebar_core::{ClockSource, SystemClock};
use tower::Service;
use tracing::{info, warn};
use uuid::Uuid;

use super::DomainError;
use crate::service::config::ServerConfig;
use crate::service::operation::{service_names, Operation, OperationError, OperationResponse};
use crate::service::registry::{ManagedService, ServiceContext};
use crate::storage::{Order, OrderStatus, Repository};

// ---------------------------------------------------------------------------
// Key generation
// ---------------------------------------------------------------------------

/// Source of candidate order keys.
///
/// Candidates are not trusted to be unique: the order service checks each
/// one and asks again on a clash.
pub trait OrderKeyGenerator: Send + Sync {
    fn next_key(&self) -> Uuid;
}

/// Random 128-bit (v4) keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl OrderKeyGenerator for RandomKeyGenerator {
    fn next_key(&self) -> Uuid {
        Uuid::new_v4()
    }
}

// ---------------------------------------------------------------------------
// OrderService
// ---------------------------------------------------------------------------

/// Creates orders and reports on them.
///
/// Every order gets a status entry under the same key at creation. After
/// that the service never changes a status itself; fulfillment updates go
/// straight to the status repository.
///
/// Creating an order performs two independent writes (order, then status).
/// They are not atomic: a failure between them leaves an order without a
/// status.
pub struct OrderService {
    orders: Arc<dyn Repository<Order>>,
    order_statuses: Arc<dyn Repository<OrderStatus>>,
    config: Arc<ServerConfig>,
    clock: Arc<dyn ClockSource>,
    keys: Arc<dyn OrderKeyGenerator>,
    /// Every key handed out in this process, so deleted keys are never reissued.
    ///
    /// Never pruned: it grows by one entry per created order, deleted orders
    /// included, for the lifetime of the process.
    issued: DashSet<Uuid>,
}

impl OrderService {
    /// Creates a service using the system clock and random keys.
    #[must_use]
    pub fn new(
        orders: Arc<dyn Repository<Order>>,
        order_statuses: Arc<dyn Repository<OrderStatus>>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            orders,
            order_statuses,
            config,
            clock: Arc::new(SystemClock),
            keys: Arc::new(RandomKeyGenerator),
            issued: DashSet::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_key_generator(mut self, keys: Arc<dyn OrderKeyGenerator>) -> Self {
        self.keys = keys;
        self
    }

    /// Stores a new order and its initial status, returning the fresh key.
    ///
    /// The payload is not validated here. Its key and submission time, if
    /// present, are replaced. Two calls with equal payloads create two orders.
    ///
    /// # Errors
    ///
    /// - [`DomainError::KeyCollision`] if no unused key turned up within the
    ///   configured attempts. Nothing is written in that case.
    /// - [`DomainError::Repository`] if either write is rejected.
    pub fn create_order(&self, event: CreateOrderEvent) -> Result<OrderCreatedEvent, DomainError> {
        let key = self.issue_key()?;
        let now = self.clock.now();

        let order = Order::new(key, event.details, now);
        let details = order.to_details();
        self.orders.save(order)?;
        self.order_statuses.save(OrderStatus::new(
            key,
            self.config.initial_order_status.clone(),
            now,
        ))?;

        info!(
            order_key = %key,
            items = details.item_count(),
            status = %self.config.initial_order_status,
            "order created"
        );
        Ok(OrderCreatedEvent {
            new_order_key: key,
            details,
        })
    }

    /// Looks up the current status label. Unknown ids report `found: false`.
    #[must_use]
    pub fn request_order_status(&self, request: &RequestOrderStatusEvent) -> OrderStatusEvent {
        match self.order_statuses.find_by_id(&request.order_id) {
            Some(status) => {
                OrderStatusEvent::found(status.order_id, status.status, status.status_date)
            }
            None => OrderStatusEvent::not_found(request.order_id),
        }
    }

    /// Every stored order, in no particular order.
    #[must_use]
    pub fn request_all_orders(&self, _request: &RequestAllOrdersEvent) -> AllOrdersEvent {
        AllOrdersEvent {
            orders_details: self
                .orders
                .find_all()
                .iter()
                .map(Order::to_details)
                .collect(),
        }
    }

    #[must_use]
    pub fn request_order_details(&self, request: &RequestOrderDetailsEvent) -> OrderDetailsEvent {
        let details = self.orders.find_by_id(&request.key).as_ref().map(Order::to_details);
        OrderDetailsEvent::new(request.key, details)
    }

    /// Removes an order and its status. Unknown keys are a no-op.
    ///
    /// Of several concurrent deletes for one key, only the caller that
    /// actually removed the order sees `deletion_completed: true`.
    #[must_use]
    pub fn delete_order(&self, request: &DeleteOrderEvent) -> OrderDeletedEvent {
        let details = self.orders.delete(&request.key).as_ref().map(Order::to_details);
        self.order_statuses.delete(&request.key);

        let deletion_completed = details.is_some();
        if deletion_completed {
            info!(order_key = %request.key, "order deleted");
        }
        OrderDeletedEvent {
            key: request.key,
            details,
            deletion_completed,
        }
    }

    fn handle_operation(&self, op: Operation) -> Result<Message, OperationError> {
        Ok(match op {
            Operation::CreateOrder { payload, .. } => Message::OrderCreated {
                payload: self.create_order(payload)?,
            },
            Operation::RequestOrderStatus { payload, .. } => Message::OrderStatus {
                payload: self.request_order_status(&payload),
            },
            Operation::RequestAllOrders { payload, .. } => Message::AllOrders {
                payload: self.request_all_orders(&payload),
            },
            Operation::RequestOrderDetails { payload, .. } => Message::OrderDetails {
                payload: self.request_order_details(&payload),
            },
            Operation::DeleteOrder { payload, .. } => Message::OrderDeleted {
                payload: self.delete_order(&payload),
            },
            other @ Operation::RequestAllMenuItems { .. } => {
                return Err(OperationError::WrongService {
                    service: service_names::ORDERS,
                    operation: other.name(),
                });
            }
        })
    }

    fn issue_key(&self) -> Result<Uuid, DomainError> {
        let attempts = self.config.key_generation_attempts;
        for attempt in 1..=attempts {
            let key = self.keys.next_key();
            if key.is_nil() || self.orders.contains_key(&key) || !self.issued.insert(key) {
                warn!(order_key = %key, attempt, "order key already issued, regenerating");
                continue;
            }
            return Ok(key);
        }
        Err(DomainError::KeyCollision { attempts })
    }
}

#[async_trait]
impl ManagedService for OrderService {
    fn name(&self) -> &'static str {
        service_names::ORDERS
    }

    async fn init(&self, ctx: &ServiceContext) -> anyhow::Result<()> {
        info!(
            node = %ctx.config.node_id,
            orders = self.orders.len(),
            initial_status = %self.config.initial_order_status,
            "order service ready"
        );
        Ok(())
    }

    async fn shutdown(&self, terminate: bool) -> anyhow::Result<()> {
        info!(
            orders = self.orders.len(),
            issued_keys = self.issued.len(),
            terminate,
            "order service stopped"
        );
        Ok(())
    }
}

/// Nothing touches a repository until the returned future is polled.
impl Service<Operation> for Arc<OrderService> {
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let svc = Arc::clone(self);
        Box::pin(async move { svc.handle_operation(op).map(OperationResponse::message) })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
