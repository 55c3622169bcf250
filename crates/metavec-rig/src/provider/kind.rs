use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Embedding backends selectable through configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EmbeddingProviderKind {
    /// OpenAI public API.
    #[default]
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi,
    /// Cohere.
    Cohere,
    /// Google Gemini.
    Gemini,
    /// Azure OpenAI deployment.
    #[serde(rename = "azure-openai")]
    #[strum(serialize = "azure-openai")]
    AzureOpenAi,
}

impl EmbeddingProviderKind {
    /// Returns the provider name.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
