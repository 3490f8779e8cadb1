//! Azure AI Search provider implementation.
//!
//! This module provides the concrete implementation of `SearchServiceProvider`
//! on top of the search service's REST management API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use search_provisioner_shared::CatalogItem;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::SearchServiceConfig;
use crate::errors::SearchServiceError;
use crate::interfaces::SearchServiceProvider;
use crate::types::{
    BatchOperationResult, BatchOperationSummary, DataSourceDefinition, IndexDefinition,
    IndexerDefinition, SkillsetDefinition,
};
use crate::utils::validate_resource_name;

/// Azure AI Search provider.
///
/// # Example
///
/// ```ignore
/// use search_provisioner_repository::{AzureSearchProvider, SearchServiceConfig};
/// use search_provisioner_repository::azure::catalog_index_definition;
///
/// let config = SearchServiceConfig::for_service("contoso-search", "<admin key>");
/// let provider = AzureSearchProvider::new(config)?;
///
/// if provider.get_index("catalog").await?.is_none() {
///     provider.create_index(&catalog_index_definition("catalog")).await?;
/// }
/// ```
pub struct AzureSearchProvider {
    client: Client,
    base_url: Url,
    config: SearchServiceConfig,
}

/// Body of a document indexing response.
#[derive(Debug, Deserialize)]
struct IndexingResponse {
    value: Vec<IndexingResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexingResult {
    key: String,
    status: bool,
    #[serde(default)]
    error_message: Option<String>,
    status_code: u16,
}

impl AzureSearchProvider {
    /// Create a new provider for the configured search service.
    ///
    /// # Returns
    ///
    /// * `Ok(AzureSearchProvider)` - A new provider instance
    /// * `Err(SearchServiceError)` - If the endpoint is invalid or the HTTP client cannot be built
    pub fn new(config: SearchServiceConfig) -> Result<Self, SearchServiceError> {
        let base_url = Url::parse(&config.endpoint).map_err(|e| {
            SearchServiceError::connection(format!(
                "Invalid search endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SearchServiceError::connection(format!(
                "Search endpoint '{}' cannot be used as a base URL",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchServiceError::connection(e.to_string()))?;

        info!(
            endpoint = %config.endpoint,
            api_version = %config.api_version,
            "Created search service provider"
        );

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Build a request URL from path segments, appending the API version.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("api-version", &self.config.api_version);
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client
            .request(method, self.url(segments))
            .header("api-key", &self.config.api_key)
    }

    /// Send a request and turn 404 and other non-success statuses into errors.
    async fn send(
        &self,
        request: RequestBuilder,
        kind: &str,
        name: &str,
    ) -> Result<Response, SearchServiceError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(kind = %kind, name = %name, "Resource not found");
            return Err(SearchServiceError::not_found(kind, name));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, kind = %kind, name = %name, body = %body, "Request failed");
            return Err(SearchServiceError::request_failed(status.as_u16(), body));
        }
        Ok(response)
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        collection: &str,
        kind: &str,
        name: &str,
    ) -> Result<Option<T>, SearchServiceError> {
        validate_resource_name(kind, name)?;
        match self
            .send(self.request(Method::GET, &[collection, name]), kind, name)
            .await
        {
            Ok(response) => {
                let resource = response
                    .json::<T>()
                    .await
                    .map_err(|e| SearchServiceError::parse(e.to_string()))?;
                Ok(Some(resource))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn document_batch(documents: &[CatalogItem]) -> Result<Value, SearchServiceError> {
        let actions = documents
            .iter()
            .map(|doc| {
                let mut value = serde_json::to_value(doc)?;
                if let Value::Object(ref mut map) = value {
                    map.insert("@search.action".to_string(), json!("upload"));
                }
                Ok(value)
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(json!({ "value": actions }))
    }

    fn summarize(response: IndexingResponse) -> BatchOperationSummary {
        let mut summary = BatchOperationSummary::default();
        for result in response.value {
            summary.total += 1;
            if result.status {
                summary.succeeded += 1;
                summary.results.push(BatchOperationResult {
                    key: result.key,
                    success: true,
                    error: None,
                });
            } else {
                summary.failed += 1;
                let message = result
                    .error_message
                    .unwrap_or_else(|| "document rejected".to_string());
                summary.results.push(BatchOperationResult {
                    key: result.key,
                    success: false,
                    error: Some(SearchServiceError::request_failed(
                        result.status_code,
                        message,
                    )),
                });
            }
        }
        summary
    }

    async fn upload_batch(
        &self,
        index_name: &str,
        documents: &[CatalogItem],
    ) -> Result<BatchOperationSummary, SearchServiceError> {
        let body = Self::document_batch(documents)?;
        let response = self
            .send(
                self.request(Method::POST, &["indexes", index_name, "docs", "index"])
                    .json(&body),
                "index",
                index_name,
            )
            .await?;

        // 207 carries per-document failures in the same shape as 200.
        let parsed = response
            .json::<IndexingResponse>()
            .await
            .map_err(|e| SearchServiceError::parse(e.to_string()))?;
        Ok(Self::summarize(parsed))
    }
}

#[async_trait]
impl SearchServiceProvider for AzureSearchProvider {
    async fn get_index(&self, name: &str) -> Result<Option<IndexDefinition>, SearchServiceError> {
        self.get_resource("indexes", "index", name).await
    }

    #[instrument(skip(self, index), fields(index = %index.name))]
    async fn create_index(&self, index: &IndexDefinition) -> Result<(), SearchServiceError> {
        validate_resource_name("index", &index.name)?;
        self.send(
            self.request(Method::POST, &["indexes"]).json(index),
            "index",
            &index.name,
        )
        .await?;

        debug!(index = %index.name, fields = index.fields.len(), "Index created");
        Ok(())
    }

    /// Upload documents in batches of at most `max_batch_size`.
    ///
    /// A batch rejected as a whole aborts the upload; per-document rejections
    /// are collected into the summary.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    async fn upload_documents(
        &self,
        index_name: &str,
        documents: &[CatalogItem],
    ) -> Result<BatchOperationSummary, SearchServiceError> {
        validate_resource_name("index", index_name)?;

        let mut summary = BatchOperationSummary::default();
        if documents.is_empty() {
            return Ok(summary);
        }

        let batch_size = self
            .config
            .max_batch_size
            .unwrap_or(documents.len())
            .max(1);

        for batch in documents.chunks(batch_size) {
            let batch_summary = self.upload_batch(index_name, batch).await?;
            debug!(
                index = %index_name,
                succeeded = batch_summary.succeeded,
                failed = batch_summary.failed,
                "Uploaded document batch"
            );
            summary.merge(batch_summary);
        }

        Ok(summary)
    }

    async fn document_count(&self, index_name: &str) -> Result<u64, SearchServiceError> {
        validate_resource_name("index", index_name)?;
        let response = self
            .send(
                self.request(Method::GET, &["indexes", index_name, "docs", "$count"]),
                "index",
                index_name,
            )
            .await?;

        let text = response.text().await?;
        text.trim_start_matches('\u{feff}')
            .trim()
            .parse::<u64>()
            .map_err(|e| {
                SearchServiceError::parse(format!("Invalid document count '{}': {}", text, e))
            })
    }

    #[instrument(skip(self, data_source), fields(data_source = %data_source.name))]
    async fn create_or_update_data_source(
        &self,
        data_source: &DataSourceDefinition,
    ) -> Result<(), SearchServiceError> {
        validate_resource_name("data source", &data_source.name)?;
        self.send(
            self.request(Method::PUT, &["datasources", &data_source.name])
                .json(data_source),
            "data source",
            &data_source.name,
        )
        .await?;

        debug!(data_source = %data_source.name, "Data source created or updated");
        Ok(())
    }

    async fn get_data_source(
        &self,
        name: &str,
    ) -> Result<Option<DataSourceDefinition>, SearchServiceError> {
        self.get_resource("datasources", "data source", name).await
    }

    #[instrument(skip(self, skillset), fields(skillset = %skillset.name))]
    async fn create_or_update_skillset(
        &self,
        skillset: &SkillsetDefinition,
    ) -> Result<(), SearchServiceError> {
        validate_resource_name("skillset", &skillset.name)?;
        if skillset.skills.is_empty() {
            return Err(SearchServiceError::validation(
                "A skillset needs at least one skill",
            ));
        }

        self.send(
            self.request(Method::PUT, &["skillsets", &skillset.name])
                .json(skillset),
            "skillset",
            &skillset.name,
        )
        .await?;

        debug!(
            skillset = %skillset.name,
            skills = skillset.skills.len(),
            "Skillset created or updated"
        );
        Ok(())
    }

    async fn get_skillset(
        &self,
        name: &str,
    ) -> Result<Option<SkillsetDefinition>, SearchServiceError> {
        self.get_resource("skillsets", "skillset", name).await
    }

    #[instrument(skip(self))]
    async fn delete_indexer(&self, name: &str) -> Result<bool, SearchServiceError> {
        validate_resource_name("indexer", name)?;
        match self
            .send(self.request(Method::DELETE, &["indexers", name]), "indexer", name)
            .await
        {
            Ok(_) => {
                debug!(indexer = %name, "Indexer deleted");
                Ok(true)
            }
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, indexer), fields(indexer = %indexer.name))]
    async fn create_indexer(&self, indexer: &IndexerDefinition) -> Result<(), SearchServiceError> {
        validate_resource_name("indexer", &indexer.name)?;
        self.send(
            self.request(Method::POST, &["indexers"]).json(indexer),
            "indexer",
            &indexer.name,
        )
        .await?;

        debug!(indexer = %indexer.name, "Indexer created");
        Ok(())
    }

    async fn get_indexer(
        &self,
        name: &str,
    ) -> Result<Option<IndexerDefinition>, SearchServiceError> {
        self.get_resource("indexers", "indexer", name).await
    }
}
