//! Mock providers for testing.

mod embedding;

pub use embedding::{MockEmbeddingConfig, MockEmbeddingProvider, MockEmbeddingStats};
