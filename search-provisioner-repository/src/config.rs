//! Connection configuration for the Azure providers.

use std::fmt;
use std::time::Duration;

/// Default REST API version of the search service.
pub const DEFAULT_API_VERSION: &str = "2024-07-01";

/// Default request timeout for both providers.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of documents the service accepts in one indexing batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Configuration for the search service provider.
///
/// Use `for_service` when only the service name is known; the endpoint is then
/// derived as `https://{name}.search.windows.net`.
#[derive(Clone)]
pub struct SearchServiceConfig {
    /// Base URL of the search service.
    pub endpoint: String,
    /// Admin API key sent in the `api-key` header.
    pub api_key: String,
    /// REST API version appended to every request.
    pub api_version: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum number of documents allowed in a single upload batch.
    ///
    /// Set to `None` to send every document in one request.
    pub max_batch_size: Option<usize>,
}

impl SearchServiceConfig {
    /// Create a config for an explicit endpoint.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            max_batch_size: Some(DEFAULT_MAX_BATCH_SIZE),
        }
    }

    /// Create a config for a service name, deriving the public endpoint.
    pub fn for_service(service_name: &str, api_key: impl Into<String>) -> Self {
        Self::new(
            format!("https://{}.search.windows.net", service_name),
            api_key,
        )
    }

    /// Override the REST API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the upload batch size limit.
    pub fn with_max_batch_size(mut self, max_batch_size: Option<usize>) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }
}

impl fmt::Debug for SearchServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("max_batch_size", &self.max_batch_size)
            .finish_non_exhaustive()
    }
}

/// Configuration for the blob storage provider.
#[derive(Clone)]
pub struct BlobStorageConfig {
    /// Storage account name, also used in the Shared Key signature.
    pub account_name: String,
    /// Base64-encoded storage account key.
    pub account_key: String,
    /// Base URL of the blob service.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl BlobStorageConfig {
    /// Create a config for a storage account, deriving the public blob endpoint.
    pub fn new(account_name: impl Into<String>, account_key: impl Into<String>) -> Self {
        let account_name = account_name.into();
        let endpoint = format!("https://{}.blob.core.windows.net", account_name);
        Self {
            account_name,
            account_key: account_key.into(),
            endpoint,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the blob endpoint (e.g. for an emulator).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for BlobStorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStorageConfig")
            .field("account_name", &self.account_name)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
