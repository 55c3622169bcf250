#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
pub mod pipeline;

pub use error::{ItemError, ItemErrorKind, PipelineError, PipelineResult};
pub use pipeline::{BatchResult, FailedItem, ItemOutcome, Pipeline, PipelineConfig};

/// Tracing target for runtime operations.
pub const TRACING_TARGET: &str = "metavec_runtime";
