//! Azure Blob Storage provider implementation.
//!
//! Only container creation is needed: the search service reads the blobs
//! itself through the data-source connection string.

use async_trait::async_trait;
use reqwest::{header::CONTENT_LENGTH, Client, StatusCode};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::BlobStorageConfig;
use crate::errors::SearchServiceError;
use crate::interfaces::{BlobContainerProvider, ContainerStatus};
use crate::utils;

use super::shared_key::SharedKeyCredential;

/// Storage REST API version used for container operations.
const STORAGE_API_VERSION: &str = "2021-08-06";

/// Azure Blob Storage provider.
///
/// The account key is decoded on every request rather than at construction,
/// so a bad key surfaces as a failed container operation instead of aborting
/// start-up.
pub struct AzureBlobProvider {
    client: Client,
    config: BlobStorageConfig,
}

impl AzureBlobProvider {
    /// Create a new provider for the configured storage account.
    ///
    /// # Returns
    ///
    /// * `Ok(AzureBlobProvider)` - A new provider instance
    /// * `Err(SearchServiceError)` - If the endpoint is invalid or the HTTP client cannot be built
    pub fn new(config: BlobStorageConfig) -> Result<Self, SearchServiceError> {
        Url::parse(&config.endpoint).map_err(|e| {
            SearchServiceError::connection(format!(
                "Invalid blob endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchServiceError::connection(e.to_string()))?;

        info!(
            account = %config.account_name,
            endpoint = %config.endpoint,
            "Created blob storage provider"
        );

        Ok(Self { client, config })
    }

    fn container_url(&self, container: &str) -> Result<Url, SearchServiceError> {
        let mut url = Url::parse(&self.config.endpoint)
            .map_err(|e| SearchServiceError::connection(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| {
                SearchServiceError::connection(format!(
                    "Blob endpoint '{}' cannot be used as a base URL",
                    self.config.endpoint
                ))
            })?
            .pop_if_empty()
            .push(container);
        url.query_pairs_mut().append_pair("restype", "container");
        Ok(url)
    }
}

/// Validate a container name against the storage naming rules.
///
/// Names are 3 to 63 characters of lowercase letters, digits and single
/// hyphens, starting and ending with a letter or digit.
pub fn validate_container_name(name: &str) -> Result<(), SearchServiceError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let valid_edges = !name.starts_with('-') && !name.ends_with('-');

    if !(3..=63).contains(&name.len()) || !valid_chars || !valid_edges || name.contains("--") {
        return Err(SearchServiceError::validation(format!(
            "Invalid container name '{}': use 3-63 lowercase letters, digits or single hyphens",
            name
        )));
    }
    Ok(())
}

#[async_trait]
impl BlobContainerProvider for AzureBlobProvider {
    #[instrument(skip(self))]
    async fn create_container_if_not_exists(
        &self,
        container: &str,
    ) -> Result<ContainerStatus, SearchServiceError> {
        validate_container_name(container)?;
        let credential =
            SharedKeyCredential::new(&self.config.account_name, &self.config.account_key)?;

        let url = self.container_url(container)?;
        let date = chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();
        let ms_headers = [
            ("x-ms-date", date.as_str()),
            ("x-ms-version", STORAGE_API_VERSION),
        ];
        let authorization = credential.authorization("PUT", 0, &ms_headers, &url)?;

        let response = self
            .client
            .put(url)
            .header("x-ms-date", &date)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header(CONTENT_LENGTH, "0")
            .header("Authorization", authorization)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::CREATED => {
                debug!(container = %container, "Container created");
                Ok(ContainerStatus::Created)
            }
            StatusCode::CONFLICT => {
                let code = response
                    .headers()
                    .get("x-ms-error-code")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("ContainerAlreadyExists")
                    .to_string();
                if code == "ContainerAlreadyExists" {
                    debug!(container = %container, "Container already exists");
                    Ok(ContainerStatus::AlreadyExists)
                } else {
                    let body = response.text().await.unwrap_or_default();
                    error!(status = %status, code = %code, "Create container request failed");
                    Err(SearchServiceError::request_failed(
                        status.as_u16(),
                        format!("{}: {}", code, body),
                    ))
                }
            }
            StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %body, "Storage rejected the request signature");
                Err(SearchServiceError::authentication(format!(
                    "Storage account '{}' rejected the credentials: {}",
                    self.config.account_name, body
                )))
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %body, "Create container request failed");
                Err(SearchServiceError::request_failed(status.as_u16(), body))
            }
        }
    }

    fn connection_string(&self) -> String {
        utils::storage_connection_string(&self.config.account_name, &self.config.account_key)
    }
}
