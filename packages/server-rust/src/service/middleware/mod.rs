//! Tower middleware for the operation pipeline.
//!
//! - [`trace`]: per-operation `tracing` span with timing and outcome
//! - [`pipeline`]: composes the layers around the router

pub mod pipeline;
pub mod trace;

pub use pipeline::{build_operation_pipeline, OperationPipeline};
pub use trace::OperationTraceLayer;
