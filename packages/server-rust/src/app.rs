//! Composition root: wires repositories, services, and the operation pipeline.

use std::sync::Arc;

use noodlebar_core::messages::Message;
use noodlebar_core::{decode, encode, ClockSource, CodecError, SystemClock};
use tower::{Service, ServiceExt};
use tracing::info;

use crate::service::{
    build_operation_pipeline, service_names, ClassifyError, MenuService, MessageClassifier,
    Operation, OperationError, OperationPipeline, OperationResponse, OrderService,
    OperationRouter, ServerConfig, ServiceContext, ServiceRegistry,
};
use crate::storage::{default_menu, OrderStatus, Repositories, Repository};

/// Failure of a request submitted through [`NoodlebarApp::handle`].
#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// The assembled ordering backend.
///
/// Owns the repositories and both domain services, and exposes the same
/// service instances through the registry (for lifecycle) and the pipeline
/// (for requests).
pub struct NoodlebarApp {
    config: Arc<ServerConfig>,
    repositories: Repositories,
    menu: Arc<MenuService>,
    orders: Arc<OrderService>,
    registry: ServiceRegistry,
    classifier: MessageClassifier,
    pipeline: tokio::sync::Mutex<OperationPipeline>,
}

impl NoodlebarApp {
    /// Builds the app on in-memory repositories and the system clock.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let menu = if config.seed_default_menu {
            default_menu()
        } else {
            Vec::new()
        };
        let repositories = Repositories::in_memory(menu)?;
        Self::from_parts(config, repositories, Arc::new(SystemClock))
    }

    /// Builds the app on caller-supplied repositories and clock.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate.
    pub fn from_parts(
        config: ServerConfig,
        repositories: Repositories,
        clock: Arc<dyn ClockSource>,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let menu = Arc::new(MenuService::new(Arc::clone(&repositories.menu_items)));
        let orders = Arc::new(
            OrderService::new(
                Arc::clone(&repositories.orders),
                Arc::clone(&repositories.order_statuses),
                Arc::clone(&config),
            )
            .with_clock(Arc::clone(&clock)),
        );

        let registry = ServiceRegistry::new();
        registry.register(Arc::clone(&menu));
        registry.register(Arc::clone(&orders));

        let mut router = OperationRouter::new();
        router.register(service_names::MENU, Arc::clone(&menu));
        router.register(service_names::ORDERS, Arc::clone(&orders));

        Ok(Self {
            config,
            repositories,
            menu,
            orders,
            registry,
            classifier: MessageClassifier::new(clock),
            pipeline: tokio::sync::Mutex::new(build_operation_pipeline(router)),
        })
    }

    /// Runs every service's `init` in registration order.
    ///
    /// # Errors
    ///
    /// Propagates the first failing `init`.
    pub async fn start(&self) -> anyhow::Result<()> {
        let ctx = ServiceContext {
            config: Arc::clone(&self.config),
        };
        self.registry.init_all(&ctx).await?;
        info!(
            node = %self.config.node_id,
            services = ?self.registry.names(),
            "noodlebar started"
        );
        Ok(())
    }

    /// Shuts services down in reverse registration order.
    ///
    /// # Errors
    ///
    /// Propagates the first failing `shutdown`.
    pub async fn shutdown(&self, terminate: bool) -> anyhow::Result<()> {
        self.registry.shutdown_all(terminate).await
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.repositories
    }

    #[must_use]
    pub fn menu_service(&self) -> &Arc<MenuService> {
        &self.menu
    }

    #[must_use]
    pub fn order_service(&self) -> &Arc<OrderService> {
        &self.orders
    }

    /// The status repository, for fulfillment processes that advance orders.
    #[must_use]
    pub fn order_statuses(&self) -> Arc<dyn Repository<OrderStatus>> {
        Arc::clone(&self.repositories.order_statuses)
    }

    #[must_use]
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Sends an already-classified operation through the pipeline.
    ///
    /// The pipeline lock covers readiness and building the response future
    /// only; the service work runs after it is released.
    ///
    /// # Errors
    ///
    /// Returns whatever the routed service returns.
    pub async fn dispatch(&self, op: Operation) -> Result<OperationResponse, OperationError> {
        let fut = {
            let mut pipeline = self.pipeline.lock().await;
            ServiceExt::<Operation>::ready(&mut *pipeline).await?;
            pipeline.call(op)
        };
        fut.await
    }

    /// Classifies a request message, dispatches it, and returns the response.
    ///
    /// # Errors
    ///
    /// [`HandleError::Classify`] for response messages, otherwise
    /// [`HandleError::Operation`] from the service.
    pub async fn handle(&self, msg: Message) -> Result<Message, HandleError> {
        let op = self.classifier.classify(msg, None)?;
        Ok(self.dispatch(op).await?.into_message())
    }

    /// MessagePack in, MessagePack out.
    ///
    /// # Errors
    ///
    /// [`HandleError::Codec`] for undecodable input, plus everything
    /// [`Self::handle`] can return.
    pub async fn handle_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, HandleError> {
        let response = self.handle(decode(bytes)?).await?;
        Ok(encode(&response)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use chrono::Utc;
    use noodlebar_core::messages::{
        AllMenuItemsEvent, CreateOrderEvent, OrderDetails, RequestAllMenuItemsEvent,
        RequestOrderStatusEvent,
    };

    use super::*;
    use crate::service::{ConfigError, OperationContext};
    use crate::storage::testing::SlowRepository;
    use crate::storage::MenuItem;

    fn menu_request() -> Message {
        Message::RequestAllMenuItems {
            payload: RequestAllMenuItemsEvent {},
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = NoodlebarApp::new(ServerConfig {
            key_generation_attempts: 0,
            ..ServerConfig::default()
        })
        .err()
        .unwrap();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::NoKeyAttempts)
        );
    }

    #[tokio::test]
    async fn start_registers_both_services() {
        let app = NoodlebarApp::new(ServerConfig::default()).unwrap();
        app.start().await.unwrap();
        assert_eq!(app.registry().names(), vec!["menu", "orders"]);
        assert!(app.registry().get::<OrderService>().is_some());
        app.shutdown(false).await.unwrap();
    }

    #[tokio::test]
    async fn unseeded_menu_is_empty() {
        let app = NoodlebarApp::new(ServerConfig {
            seed_default_menu: false,
            ..ServerConfig::default()
        })
        .unwrap();
        let resp = app.handle(menu_request()).await.unwrap();
        assert!(matches!(
            resp,
            Message::AllMenuItems { payload } if payload.menu_item_details.is_empty()
        ));
    }

    #[tokio::test]
    async fn responses_cannot_be_submitted() {
        let app = NoodlebarApp::new(ServerConfig::default()).unwrap();
        let err = app
            .handle(Message::AllMenuItems {
                payload: AllMenuItemsEvent::new(Vec::new()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HandleError::Classify(_)));
    }

    #[tokio::test]
    async fn garbage_bytes_are_a_codec_error() {
        let app = NoodlebarApp::new(ServerConfig::default()).unwrap();
        let err = app.handle_bytes(&[0xc1, 0x00]).await.unwrap_err();
        assert!(matches!(err, HandleError::Codec(_)));
    }

    #[tokio::test]
    async fn status_updates_from_outside_are_reported() {
        let app = NoodlebarApp::new(ServerConfig::default()).unwrap();
        let Message::OrderCreated { payload: created } = app
            .handle(Message::CreateOrder {
                payload: CreateOrderEvent::new(OrderDetails::for_customer("A", "B", "C")),
            })
            .await
            .unwrap()
        else {
            panic!("expected ORDER_CREATED");
        };

        app.order_statuses()
            .save(OrderStatus::new(created.new_order_key, "ready", Utc::now()))
            .unwrap();

        let resp = app
            .handle(Message::RequestOrderStatus {
                payload: RequestOrderStatusEvent {
                    order_id: created.new_order_key,
                },
            })
            .await
            .unwrap();
        assert!(matches!(
            resp,
            Message::OrderStatus { payload } if payload.status.as_deref() == Some("ready")
        ));
    }

    #[tokio::test]
    async fn misrouted_operation_is_rejected() {
        let app = NoodlebarApp::new(ServerConfig::default()).unwrap();
        let op = Operation::CreateOrder {
            ctx: OperationContext::new(1, service_names::MENU, Utc::now()),
            payload: CreateOrderEvent::new(OrderDetails::for_customer("A", "B", "C")),
        };
        let err = app.dispatch(op).await.unwrap_err();
        assert!(matches!(
            err,
            OperationError::WrongService {
                service: "menu",
                operation: "create_order"
            }
        ));
        assert!(app.repositories().orders.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_run_in_parallel() {
        let delay = Duration::from_millis(200);
        let mut repositories = Repositories::in_memory(Vec::new()).unwrap();
        repositories.menu_items =
            Arc::new(SlowRepository::<MenuItem>::seeded(default_menu(), delay));
        let app = Arc::new(
            NoodlebarApp::from_parts(ServerConfig::default(), repositories, Arc::new(SystemClock))
                .unwrap(),
        );

        let started = Instant::now();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let app = Arc::clone(&app);
                tokio::spawn(async move { app.handle(menu_request()).await })
            })
            .collect();
        for handle in handles {
            let resp = handle.await.unwrap().unwrap();
            assert!(matches!(
                resp,
                Message::AllMenuItems { payload } if payload.menu_item_details.len() == 3
            ));
        }

        let elapsed = started.elapsed();
        assert!(elapsed < delay * 3, "four reads took {elapsed:?}");
    }
}
