use std::any::{Any, TypeId};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::config::ServerConfig;

// ---------------------------------------------------------------------------
// ServiceContext
// ---------------------------------------------------------------------------

/// Context provided to services during initialization.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub config: Arc<ServerConfig>,
}

// ---------------------------------------------------------------------------
// ManagedService trait
// ---------------------------------------------------------------------------

/// Lifecycle hooks for the domain services.
///
/// Services are registered with a [`ServiceRegistry`], initialized in
/// registration order, and shut down in reverse registration order. The `Any`
/// bound enables type-based lookup via `ServiceRegistry::get::<T>()`.
#[async_trait]
pub trait ManagedService: Send + Sync + Any {
    /// Unique routing name of this service (e.g. `"menu"`, `"orders"`).
    fn name(&self) -> &'static str;

    /// Called once before the service takes traffic.
    async fn init(&self, ctx: &ServiceContext) -> anyhow::Result<()>;

    /// Called once at shutdown. If `terminate` is true, skip graceful cleanup.
    async fn shutdown(&self, terminate: bool) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// ServiceRegistry
// ---------------------------------------------------------------------------

/// Registry for lifecycle-managed services.
///
/// Lookup is either by name (`get_by_name`) or by concrete type (`get::<T>`).
/// Registering takes an `Arc` so the same instance can also be handed to the
/// operation router.
pub struct ServiceRegistry {
    by_name: DashMap<&'static str, Arc<dyn ManagedService>>,
    by_type: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    /// Registration order for deterministic init/shutdown sequencing.
    init_order: RwLock<Vec<&'static str>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            by_type: DashMap::new(),
            init_order: RwLock::new(Vec::new()),
        }
    }

    /// Register a shared service instance.
    ///
    /// Re-registering a name replaces the earlier instance but keeps its
    /// original position in the init order.
    pub fn register<T: ManagedService>(&self, service: Arc<T>) {
        let name = service.name();
        let replaced = self.by_name.insert(name, service.clone()).is_some();
        self.by_type.insert(TypeId::of::<T>(), service);
        if !replaced {
            self.init_order.write().push(name);
        }
    }

    /// Retrieve a service by its concrete type.
    pub fn get<T: ManagedService>(&self) -> Option<Arc<T>> {
        self.by_type
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value().clone().downcast::<T>().ok())
    }

    /// Retrieve a service by its name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn ManagedService>> {
        self.by_name.get(name).map(|entry| entry.value().clone())
    }

    /// Names of every registered service, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.init_order.read().clone()
    }

    /// Initialize all registered services in registration order.
    ///
    /// # Errors
    ///
    /// Returns an error if any service's `init()` call fails; later services
    /// are not initialized.
    pub async fn init_all(&self, ctx: &ServiceContext) -> anyhow::Result<()> {
        for name in self.names() {
            if let Some(service) = self.get_by_name(name) {
                service.init(ctx).await?;
            }
        }
        Ok(())
    }

    /// Shut down all registered services in reverse registration order.
    ///
    /// # Errors
    ///
    /// Returns an error if any service's `shutdown()` call fails.
    pub async fn shutdown_all(&self, terminate: bool) -> anyhow::Result<()> {
        for name in self.names().iter().rev() {
            if let Some(service) = self.get_by_name(name) {
                service.shutdown(terminate).await?;
            }
        }
        Ok(())
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    /// Records lifecycle calls into a shared log.
    struct TestService {
        svc_name: &'static str,
        init_counter: AtomicU32,
        order_log: Arc<parking_lot::Mutex<Vec<String>>>,
        fail_init: bool,
    }

    impl TestService {
        fn new(name: &'static str, order_log: Arc<parking_lot::Mutex<Vec<String>>>) -> Self {
            Self {
                svc_name: name,
                init_counter: AtomicU32::new(0),
                order_log,
                fail_init: false,
            }
        }
    }

    #[async_trait]
    impl ManagedService for TestService {
        fn name(&self) -> &'static str {
            self.svc_name
        }

        async fn init(&self, _ctx: &ServiceContext) -> anyhow::Result<()> {
            self.init_counter.fetch_add(1, Ordering::SeqCst);
            self.order_log.lock().push(format!("init:{}", self.svc_name));
            if self.fail_init {
                anyhow::bail!("{} refused to start", self.svc_name);
            }
            Ok(())
        }

        async fn shutdown(&self, _terminate: bool) -> anyhow::Result<()> {
            self.order_log
                .lock()
                .push(format!("shutdown:{}", self.svc_name));
            Ok(())
        }
    }

    struct AnotherService;

    #[async_trait]
    impl ManagedService for AnotherService {
        fn name(&self) -> &'static str {
            "another"
        }
        async fn init(&self, _ctx: &ServiceContext) -> anyhow::Result<()> {
            Ok(())
        }
        async fn shutdown(&self, _terminate: bool) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn make_ctx() -> ServiceContext {
        ServiceContext {
            config: Arc::new(ServerConfig::default()),
        }
    }

    fn new_log() -> Arc<parking_lot::Mutex<Vec<String>>> {
        Arc::new(parking_lot::Mutex::new(Vec::new()))
    }

    #[test]
    fn register_and_lookup_both_ways() {
        let registry = ServiceRegistry::new();
        registry.register(Arc::new(TestService::new("menu", new_log())));
        registry.register(Arc::new(AnotherService));

        assert_eq!(registry.get_by_name("menu").unwrap().name(), "menu");
        assert_eq!(registry.get::<AnotherService>().unwrap().name(), "another");
        assert!(registry.get_by_name("nonexistent").is_none());
        assert_eq!(registry.names(), vec!["menu", "another"]);
    }

    #[test]
    fn registered_instance_is_shared() {
        let registry = ServiceRegistry::new();
        let svc = Arc::new(AnotherService);
        registry.register(Arc::clone(&svc));
        let fetched = registry.get::<AnotherService>().unwrap();
        assert!(Arc::ptr_eq(&svc, &fetched));
    }

    #[test]
    fn re_registering_keeps_one_init_slot() {
        let registry = ServiceRegistry::new();
        registry.register(Arc::new(AnotherService));
        registry.register(Arc::new(AnotherService));
        assert_eq!(registry.names(), vec!["another"]);
    }

    #[tokio::test]
    async fn init_in_order_shutdown_in_reverse() {
        let log = new_log();
        let registry = ServiceRegistry::new();
        registry.register(Arc::new(TestService::new("first", log.clone())));
        registry.register(Arc::new(TestService::new("second", log.clone())));

        registry.init_all(&make_ctx()).await.unwrap();
        registry.shutdown_all(false).await.unwrap();

        assert_eq!(
            log.lock().clone(),
            vec!["init:first", "init:second", "shutdown:second", "shutdown:first"]
        );
    }

    #[tokio::test]
    async fn init_failure_stops_the_sequence() {
        let log = new_log();
        let registry = ServiceRegistry::new();
        let mut broken = TestService::new("broken", log.clone());
        broken.fail_init = true;
        registry.register(Arc::new(broken));
        registry.register(Arc::new(TestService::new("after", log.clone())));

        let err = registry.init_all(&make_ctx()).await.unwrap_err();
        assert!(err.to_string().contains("broken refused to start"));
        assert_eq!(log.lock().clone(), vec!["init:broken"]);
    }
}
