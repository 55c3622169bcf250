//! Known embedding models and their output dimensions.

use strum::{EnumString, IntoStaticStr};

use super::EmbeddingProviderKind;

/// OpenAI embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum OpenAiEmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    #[strum(serialize = "text-embedding-3-small")]
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    #[strum(serialize = "text-embedding-3-large")]
    TextEmbedding3Large,
    /// text-embedding-ada-002 (legacy, 1536 dimensions)
    #[strum(serialize = "text-embedding-ada-002")]
    TextEmbeddingAda002,
}

impl OpenAiEmbeddingModel {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn dimensions(self) -> usize {
        match self {
            Self::TextEmbedding3Small => 1536,
            Self::TextEmbedding3Large => 3072,
            Self::TextEmbeddingAda002 => 1536,
        }
    }
}

/// Cohere embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum CohereEmbeddingModel {
    /// embed-english-v3.0 (1024 dimensions)
    #[strum(serialize = "embed-english-v3.0")]
    EmbedEnglishV3,
    /// embed-multilingual-v3.0 (1024 dimensions)
    #[strum(serialize = "embed-multilingual-v3.0")]
    EmbedMultilingualV3,
    /// embed-english-light-v3.0 (384 dimensions)
    #[strum(serialize = "embed-english-light-v3.0")]
    EmbedEnglishLightV3,
    /// embed-multilingual-light-v3.0 (384 dimensions)
    #[strum(serialize = "embed-multilingual-light-v3.0")]
    EmbedMultilingualLightV3,
}

impl CohereEmbeddingModel {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn dimensions(self) -> usize {
        match self {
            Self::EmbedEnglishV3 | Self::EmbedMultilingualV3 => 1024,
            Self::EmbedEnglishLightV3 | Self::EmbedMultilingualLightV3 => 384,
        }
    }
}

/// Google Gemini embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum GeminiEmbeddingModel {
    /// text-embedding-004 (768 dimensions)
    #[strum(serialize = "text-embedding-004")]
    TextEmbedding004,
}

impl GeminiEmbeddingModel {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn dimensions(self) -> usize {
        768
    }
}

/// Looks up the output dimensions of a well-known model.
///
/// Azure deployments are named by the operator, so the underlying OpenAI
/// model name is tried for them as well.
pub(crate) fn known_dimensions(provider: EmbeddingProviderKind, model: &str) -> Option<usize> {
    match provider {
        EmbeddingProviderKind::OpenAi | EmbeddingProviderKind::AzureOpenAi => model
            .parse::<OpenAiEmbeddingModel>()
            .ok()
            .map(OpenAiEmbeddingModel::dimensions),
        EmbeddingProviderKind::Cohere => model
            .parse::<CohereEmbeddingModel>()
            .ok()
            .map(CohereEmbeddingModel::dimensions),
        EmbeddingProviderKind::Gemini => model
            .parse::<GeminiEmbeddingModel>()
            .ok()
            .map(GeminiEmbeddingModel::dimensions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_models_report_dimensions() {
        let openai = EmbeddingProviderKind::OpenAi;
        assert_eq!(known_dimensions(openai, "text-embedding-3-large"), Some(3072));
        assert_eq!(known_dimensions(openai, "my-finetune"), None);
        assert_eq!(
            known_dimensions(EmbeddingProviderKind::Cohere, "embed-english-light-v3.0"),
            Some(384)
        );
    }
}
