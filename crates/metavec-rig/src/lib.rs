#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
pub mod provider;

pub use config::{DEFAULT_API_VERSION, DEFAULT_MODEL, EmbeddingConfig};
pub use error::{Error, Result};
pub use provider::{AzureOpenAiProvider, EmbeddingProviderKind, RigEmbeddingProvider};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "metavec_rig";
