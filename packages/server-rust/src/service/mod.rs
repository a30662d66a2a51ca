//! Operation routing and execution.
//!
//! 1. **Classification** (`classify`): `Message` -> `Result<Operation, ClassifyError>`
//! 2. **Middleware** (`middleware`): Tower layers around the router
//! 3. **Routing** (`router`): dispatch to domain services by `service_name`
//! 4. **Domain services** (`domain`): menu and order logic

pub mod classify;
pub mod config;
pub mod domain;
pub mod middleware;
pub mod operation;
pub mod registry;
pub mod router;

pub use classify::MessageClassifier;
pub use config::{ConfigError, ServerConfig};
pub use domain::{DomainError, MenuService, OrderKeyGenerator, OrderService, RandomKeyGenerator};
pub use middleware::{build_operation_pipeline, OperationPipeline};
pub use operation::{
    service_names, ClassifyError, Operation, OperationContext, OperationError, OperationResponse,
};
pub use registry::{ManagedService, ServiceContext, ServiceRegistry};
pub use router::OperationRouter;
