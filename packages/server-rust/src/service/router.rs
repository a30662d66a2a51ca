//! Operation routing: dispatches `Operation` to domain services by `service_name`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;

use super::operation::{Operation, OperationError, OperationResponse};

type BoxedFuture = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

/// A boxed Tower service handling operations for a single domain.
type BoxedService = Box<
    dyn Service<
            Operation,
            Response = OperationResponse,
            Error = OperationError,
            Future = BoxedFuture,
        > + Send,
>;

// ---------------------------------------------------------------------------
// OperationRouter
// ---------------------------------------------------------------------------

/// Routes `Operation` values to the domain service registered under their
/// `service_name`. Unregistered names yield `OperationError::UnknownService`.
pub struct OperationRouter {
    services: HashMap<&'static str, BoxedService>,
}

impl OperationRouter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Register a domain service under `name`, replacing any previous one.
    pub fn register<S>(&mut self, name: &'static str, service: S)
    where
        S: Service<Operation, Response = OperationResponse, Error = OperationError>
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        self.services.insert(name, Box::new(ServiceWrapper(service)));
    }

    /// Registered service names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.services.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for OperationRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Operation> for OperationRouter {
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = BoxedFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        for svc in self.services.values_mut() {
            match svc.poll_ready(cx) {
                Poll::Ready(Ok(())) => {}
                other => return other,
            }
        }
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let service_name = op.ctx().service_name;
        match self.services.get_mut(service_name) {
            Some(svc) => svc.call(op),
            None => Box::pin(async move {
                Err(OperationError::UnknownService {
                    name: service_name.to_string(),
                })
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ServiceWrapper
// ---------------------------------------------------------------------------

/// Type-erases a concrete `Service<Operation>` into a `BoxedService`.
struct ServiceWrapper<S>(S);

impl<S> Service<Operation> for ServiceWrapper<S>
where
    S: Service<Operation, Response = OperationResponse, Error = OperationError> + Send,
    S::Future: Send + 'static,
{
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = BoxedFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_ready(cx)
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        Box::pin(self.0.call(op))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
