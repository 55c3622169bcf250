#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod config;
mod error;
mod namespace;

pub use backend::StorageBackend;
pub use config::{BackendType, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use namespace::Namespace;

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "metavec_opendal";
