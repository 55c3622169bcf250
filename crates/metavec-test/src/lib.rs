#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod mock;
mod storage;

pub use mock::{MockEmbeddingConfig, MockEmbeddingProvider, MockEmbeddingStats};
pub use storage::{TestNamespaces, memory_namespaces, unreachable_namespaces};
