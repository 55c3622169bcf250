//! Embedding providers.

mod azure;
mod kind;
pub(crate) mod model;
mod rig_impl;

pub use azure::AzureOpenAiProvider;
pub use kind::EmbeddingProviderKind;
pub use model::{CohereEmbeddingModel, GeminiEmbeddingModel, OpenAiEmbeddingModel};
pub use rig_impl::RigEmbeddingProvider;
