//! Storage configuration types.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Supported storage backends.
///
/// Every variant parses from its kebab-case name, so the type can be used
/// directly as a command-line or environment value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BackendType {
    /// Process-local memory; contents vanish on restart.
    #[default]
    Memory,
    /// Local filesystem rooted at [`StorageConfig::root`].
    Fs,
    /// Amazon S3 or an S3-compatible service; `root` is the bucket.
    S3,
    /// Azure Blob Storage; `root` is the container.
    #[strum(serialize = "azblob")]
    #[serde(rename = "azblob")]
    AzureBlob,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StorageConfig {
    /// Which backend to connect to.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-backend", env = "STORAGE_BACKEND", default_value = "memory")
    )]
    pub backend_type: BackendType,
    /// Bucket, container or directory, depending on the backend.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-root", env = "STORAGE_ROOT", default_value = "metavec")
    )]
    pub root: String,
    /// Region (S3).
    #[cfg_attr(feature = "config", arg(long = "storage-region", env = "STORAGE_REGION"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Custom endpoint URL (S3-compatible services, Azurite).
    #[cfg_attr(
        feature = "config",
        arg(id = "storage_endpoint", long = "storage-endpoint", env = "STORAGE_ENDPOINT")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Access key ID (S3).
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-access-key-id", env = "STORAGE_ACCESS_KEY_ID")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// Secret access key (S3).
    #[cfg_attr(
        feature = "config",
        arg(
            long = "storage-secret-access-key",
            env = "STORAGE_SECRET_ACCESS_KEY",
            hide_env_values = true
        )
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
    /// Storage account name (Azure).
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-storage-account-name", env = "AZURE_STORAGE_ACCOUNT_NAME")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    /// Storage account key (Azure).
    #[cfg_attr(
        feature = "config",
        arg(
            long = "azure-storage-account-key",
            env = "AZURE_STORAGE_ACCOUNT_KEY",
            hide_env_values = true
        )
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_key: Option<String>,
    /// Full connection string (Azure); takes precedence over account fields.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "azure-storage-connection-string",
            env = "AZURE_STORAGE_CONNECTION_STRING",
            hide_env_values = true
        )
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

impl StorageConfig {
    /// Creates a configuration for the given backend and root.
    pub fn new(backend_type: BackendType, root: impl Into<String>) -> Self {
        Self {
            backend_type,
            root: root.into(),
            ..Default::default()
        }
    }

    /// Creates an in-memory configuration.
    pub fn memory() -> Self {
        Self::new(BackendType::Memory, "/")
    }

    /// Sets the custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the S3 region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the S3 access credentials.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Sets the Azure storage account.
    pub fn with_account(
        mut self,
        account_name: impl Into<String>,
        account_key: impl Into<String>,
    ) -> Self {
        self.account_name = Some(account_name.into());
        self.account_key = Some(account_key.into());
        self
    }

    /// Sets the Azure connection string.
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }
}
