//! Tracing middleware: one span per operation with timing and outcome.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::service::operation::{Operation, OperationError, OperationResponse};

// ---------------------------------------------------------------------------
// OperationTraceLayer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct OperationTraceLayer;

impl<S> Layer<S> for OperationTraceLayer {
    type Service = OperationTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OperationTraceService { inner }
    }
}

// ---------------------------------------------------------------------------
// OperationTraceService
// ---------------------------------------------------------------------------

/// Wraps each call in an `operation` span and logs its duration and outcome.
#[derive(Debug, Clone)]
pub struct OperationTraceService<S> {
    inner: S,
}

impl<S> Service<Operation> for OperationTraceService<S>
where
    S: Service<Operation, Response = OperationResponse, Error = OperationError> + Send,
    S::Future: Send + 'static,
{
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let service_name = op.ctx().service_name;
        let call_id = op.ctx().call_id;
        let operation = op.name();

        let span = info_span!(
            "operation",
            service = service_name,
            operation,
            call_id,
            client = op.ctx().client_id.as_deref(),
            duration_us = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(op);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;

                #[allow(clippy::cast_possible_truncation)]
                let duration_us = start.elapsed().as_micros() as u64;
                let outcome = if result.is_ok() { "ok" } else { "error" };

                let span = tracing::Span::current();
                span.record("duration_us", duration_us);
                span.record("outcome", outcome);

                match &result {
                    Ok(_) => tracing::info!(duration_us, outcome, "operation complete"),
                    Err(e) => tracing::warn!(duration_us, outcome, error = %e, "operation failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
