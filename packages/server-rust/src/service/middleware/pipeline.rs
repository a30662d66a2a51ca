//! Pipeline composition: wraps the router in the middleware stack.

use tower::util::BoxService;
use tower::{ServiceBuilder, ServiceExt};

use super::trace::OperationTraceLayer;
use crate::service::operation::{Operation, OperationError, OperationResponse};
use crate::service::router::OperationRouter;

/// The assembled, type-erased operation service.
pub type OperationPipeline = BoxService<Operation, OperationResponse, OperationError>;

/// Build the operation pipeline around `router`.
///
/// Only tracing is layered on. Handlers run to completion; there is no
/// timeout or load shedding.
#[must_use]
pub fn build_operation_pipeline(router: OperationRouter) -> OperationPipeline {
    ServiceBuilder::new()
        .layer(OperationTraceLayer)
        .service(router)
        .boxed()
}
