//! Integration tests for the search provisioner orchestrator.
//!
//! These tests use the real Orchestrator and provisioners but mock the
//! remote services (SearchServiceProvider and BlobContainerProvider) to
//! ensure reliable testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;

use search_provisioner::config::Dependencies;
use search_provisioner::errors::ProvisionError;
use search_provisioner::orchestrator::PipelineMode;
use search_provisioner::provisioner::{Stage, StageOutcome};
use search_provisioner::report::{RunReport, StageStatus};
use search_provisioner::verifier::ResourceCheck;
use search_provisioner::Settings;
use search_provisioner_repository::azure::SkillKind;
use search_provisioner_repository::{
    AzureBlobProvider, BatchOperationResult, BatchOperationSummary, BlobContainerProvider,
    BlobStorageConfig, ContainerStatus, DataSourceDefinition, IndexDefinition, IndexerDefinition,
    SearchServiceError, SearchServiceProvider, SkillsetDefinition,
};
use search_provisioner_shared::CatalogItem;

type CallLog = Arc<Mutex<Vec<String>>>;

// Mock SearchServiceProvider for testing
#[derive(Default)]
struct MockSearchProvider {
    calls: CallLog,
    index_exists: bool,
    fail_index_lookup: bool,
    fail_create_index: bool,
    fail_upload: bool,
    /// Number of uploaded documents the mock rejects.
    rejected_documents: usize,
    fail_data_source: Option<SearchServiceError>,
    fail_skillset: bool,
    indexer_exists: bool,
    fail_delete_indexer: bool,
    fail_create_indexer: bool,
    uploaded: Mutex<Vec<CatalogItem>>,
    data_sources: Mutex<Vec<DataSourceDefinition>>,
    skillsets: Mutex<Vec<SkillsetDefinition>>,
    indexers: Mutex<Vec<IndexerDefinition>>,
}

impl MockSearchProvider {
    fn new(calls: CallLog) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait::async_trait]
impl SearchServiceProvider for MockSearchProvider {
    async fn get_index(&self, name: &str) -> Result<Option<IndexDefinition>, SearchServiceError> {
        self.record(format!("get_index:{}", name));
        if self.fail_index_lookup {
            return Err(SearchServiceError::connection("Mock connection refused"));
        }
        Ok(self.index_exists.then(|| IndexDefinition {
            name: name.to_string(),
            fields: Vec::new(),
        }))
    }

    async fn create_index(&self, index: &IndexDefinition) -> Result<(), SearchServiceError> {
        self.record(format!("create_index:{}", index.name));
        if self.fail_create_index {
            return Err(SearchServiceError::request_failed(400, "Mock invalid schema"));
        }
        Ok(())
    }

    async fn upload_documents(
        &self,
        index_name: &str,
        documents: &[CatalogItem],
    ) -> Result<BatchOperationSummary, SearchServiceError> {
        self.record(format!("upload_documents:{}:{}", index_name, documents.len()));
        if self.fail_upload {
            return Err(SearchServiceError::request_failed(413, "Mock payload too large"));
        }
        self.uploaded.lock().unwrap().extend_from_slice(documents);

        let results: Vec<BatchOperationResult> = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let rejected = i < self.rejected_documents;
                BatchOperationResult {
                    key: doc.id.clone(),
                    success: !rejected,
                    error: rejected
                        .then(|| SearchServiceError::request_failed(400, "Mock rejected")),
                }
            })
            .collect();
        let failed = results.iter().filter(|r| !r.success).count();

        Ok(BatchOperationSummary {
            total: documents.len(),
            succeeded: documents.len() - failed,
            failed,
            results,
        })
    }

    async fn document_count(&self, index_name: &str) -> Result<u64, SearchServiceError> {
        self.record(format!("document_count:{}", index_name));
        Ok(self.uploaded.lock().unwrap().len() as u64)
    }

    async fn create_or_update_data_source(
        &self,
        data_source: &DataSourceDefinition,
    ) -> Result<(), SearchServiceError> {
        self.record(format!("put_data_source:{}", data_source.name));
        if let Some(e) = &self.fail_data_source {
            return Err(e.clone());
        }
        self.data_sources.lock().unwrap().push(data_source.clone());
        Ok(())
    }

    async fn get_data_source(
        &self,
        name: &str,
    ) -> Result<Option<DataSourceDefinition>, SearchServiceError> {
        self.record(format!("get_data_source:{}", name));
        Ok(self.data_sources.lock().unwrap().last().cloned())
    }

    async fn create_or_update_skillset(
        &self,
        skillset: &SkillsetDefinition,
    ) -> Result<(), SearchServiceError> {
        self.record(format!("put_skillset:{}", skillset.name));
        if self.fail_skillset {
            return Err(SearchServiceError::request_failed(400, "Mock invalid skill"));
        }
        self.skillsets.lock().unwrap().push(skillset.clone());
        Ok(())
    }

    async fn get_skillset(
        &self,
        name: &str,
    ) -> Result<Option<SkillsetDefinition>, SearchServiceError> {
        self.record(format!("get_skillset:{}", name));
        Ok(self.skillsets.lock().unwrap().last().cloned())
    }

    async fn delete_indexer(&self, name: &str) -> Result<bool, SearchServiceError> {
        self.record(format!("delete_indexer:{}", name));
        if self.fail_delete_indexer {
            return Err(SearchServiceError::request_failed(500, "Mock delete failure"));
        }
        Ok(self.indexer_exists)
    }

    async fn create_indexer(&self, indexer: &IndexerDefinition) -> Result<(), SearchServiceError> {
        self.record(format!("create_indexer:{}", indexer.name));
        if self.fail_create_indexer {
            return Err(SearchServiceError::request_failed(400, "Mock indexer rejected"));
        }
        self.indexers.lock().unwrap().push(indexer.clone());
        Ok(())
    }

    async fn get_indexer(
        &self,
        name: &str,
    ) -> Result<Option<IndexerDefinition>, SearchServiceError> {
        self.record(format!("get_indexer:{}", name));
        Ok(self.indexers.lock().unwrap().last().cloned())
    }
}

// Mock BlobContainerProvider for testing
struct MockBlobProvider {
    calls: CallLog,
    result: Result<ContainerStatus, SearchServiceError>,
}

impl MockBlobProvider {
    fn new(calls: CallLog, result: Result<ContainerStatus, SearchServiceError>) -> Self {
        Self { calls, result }
    }
}

#[async_trait::async_trait]
impl BlobContainerProvider for MockBlobProvider {
    async fn create_container_if_not_exists(
        &self,
        container: &str,
    ) -> Result<ContainerStatus, SearchServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("create_container:{}", container));
        self.result.clone()
    }

    fn connection_string(&self) -> String {
        "DefaultEndpointsProtocol=https;AccountName=mock;AccountKey=a2V5;EndpointSuffix=core.windows.net"
            .to_string()
    }
}

const SETTINGS: &str = r#"{
    "AISearch": { "Name": "mock-search", "Key": "search-key" },
    "StorageAccount": { "Name": "mockstorage", "Key": "a2V5" }
}"#;

fn test_settings() -> Settings {
    Settings::from_json(SETTINGS).unwrap()
}

fn strict_settings() -> Settings {
    let mut settings = test_settings();
    settings.pipeline.mode = PipelineMode::Strict;
    settings
}

// Helper function to run the full pipeline against mock providers
async fn run_pipeline(
    settings: &Settings,
    search: Arc<MockSearchProvider>,
    blob: Arc<dyn BlobContainerProvider>,
) -> RunReport {
    let deps = Dependencies::with_providers(settings, search, blob);
    timeout(Duration::from_secs(5), deps.orchestrator.run())
        .await
        .expect("Provisioning run timed out")
}

fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn position(calls: &[String], call: &str) -> usize {
    calls
        .iter()
        .position(|c| c == call)
        .unwrap_or_else(|| panic!("missing call {} in {:?}", call, calls))
}

#[tokio::test]
async fn test_fresh_run_provisions_everything() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search.clone(), blob).await;

    assert!(report.is_success());
    assert_eq!(report.exit_status(), 0);
    assert_eq!(report.succeeded(), 4);

    let stages: Vec<Stage> = report.stages.iter().map(|s| s.stage).collect();
    assert_eq!(stages, Stage::ALL.to_vec());

    assert_eq!(
        report.stage(Stage::Index).and_then(|s| s.outcome()),
        Some(&StageOutcome::IndexCreated { documents: 100 })
    );
    assert_eq!(
        report.stage(Stage::DataSource).and_then(|s| s.outcome()),
        Some(&StageOutcome::DataSourceRegistered {
            container: Some(ContainerStatus::Created)
        })
    );
    assert_eq!(
        report.stage(Stage::Indexer).and_then(|s| s.outcome()),
        Some(&StageOutcome::IndexerCreated)
    );

    let uploaded = search.uploaded.lock().unwrap();
    assert_eq!(uploaded.len(), 100);
    assert_eq!(uploaded[0].id, "1");
    assert_eq!(uploaded[99].id, "100");

    let recorded = calls(&log);
    assert!(position(&recorded, "create_index:catalog-index")
        < position(&recorded, "upload_documents:catalog-index:100"));
    assert!(position(&recorded, "create_container:catalog-documents")
        < position(&recorded, "put_data_source:catalog-blob-datasource"));
}

#[tokio::test]
async fn test_existing_index_is_not_modified() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        index_exists: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::AlreadyExists)));

    let report = run_pipeline(&test_settings(), search.clone(), blob).await;

    assert!(report.is_success());
    assert_eq!(
        report.stage(Stage::Index).and_then(|s| s.outcome()),
        Some(&StageOutcome::IndexAlreadyExists)
    );

    let recorded = calls(&log);
    assert!(!recorded.iter().any(|c| c.starts_with("create_index")));
    assert!(!recorded.iter().any(|c| c.starts_with("upload_documents")));
    assert!(search.uploaded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_upload_fails_index_stage() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        rejected_documents: 3,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert!(!report.is_success());
    assert_eq!(report.exit_status(), 1);
    match report.stage(Stage::Index).and_then(|s| s.error()) {
        Some(ProvisionError::PartialUpload {
            succeeded,
            failed,
            first_error,
        }) => {
            assert_eq!(*succeeded, 97);
            assert_eq!(*failed, 3);
            assert!(first_error.starts_with("1:"));
        }
        other => panic!("expected PartialUpload, got {:?}", other),
    }

    // Best effort: the other stages still ran
    assert_eq!(report.succeeded(), 3);
}

#[tokio::test]
async fn test_upload_rejected_as_whole_is_document_upload() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_upload: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    match report.stage(Stage::Index).and_then(|s| s.error()) {
        Some(ProvisionError::DocumentUpload(e)) => assert_eq!(e.status(), Some(413)),
        other => panic!("expected DocumentUpload, got {:?}", other),
    }
    assert_eq!(report.exit_status(), 1);
    assert!(calls(&log).contains(&"create_index:catalog-index".to_string()));
}

#[tokio::test]
async fn test_zero_catalog_skips_upload() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));
    let mut settings = test_settings();
    settings.pipeline.catalog_size = 0;

    let report = run_pipeline(&settings, search, blob).await;

    assert!(report.is_success());
    assert_eq!(
        report.stage(Stage::Index).and_then(|s| s.outcome()),
        Some(&StageOutcome::IndexCreated { documents: 0 })
    );
    let recorded = calls(&log);
    assert!(recorded.contains(&"create_index:catalog-index".to_string()));
    assert!(!recorded.iter().any(|c| c.starts_with("upload_documents")));
}

#[tokio::test]
async fn test_index_creation_failure_skips_upload() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_create_index: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert!(matches!(
        report.stage(Stage::Index).and_then(|s| s.error()),
        Some(ProvisionError::IndexCreation(_))
    ));
    assert!(!calls(&log).iter().any(|c| c.starts_with("upload_documents")));
}

#[tokio::test]
async fn test_index_lookup_failure_is_reported() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_index_lookup: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert!(matches!(
        report.stage(Stage::Index).and_then(|s| s.error()),
        Some(ProvisionError::Service(SearchServiceError::ConnectionError(_)))
    ));
    assert!(!calls(&log).iter().any(|c| c.starts_with("create_index")));
}

#[tokio::test]
async fn test_container_failure_still_registers_data_source() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(
        log.clone(),
        Err(SearchServiceError::request_failed(500, "Mock storage outage")),
    ));

    let report = run_pipeline(&test_settings(), search.clone(), blob).await;

    assert!(report.is_success());
    let stage = report.stage(Stage::DataSource).unwrap();
    assert_eq!(
        stage.outcome(),
        Some(&StageOutcome::DataSourceRegistered { container: None })
    );
    assert_eq!(stage.warnings.len(), 1);
    assert!(stage.warnings[0].contains("catalog-documents"));

    let data_sources = search.data_sources.lock().unwrap();
    assert_eq!(data_sources.len(), 1);
    assert_eq!(data_sources[0].container.name, "catalog-documents");
    assert_eq!(data_sources[0].source_type, "azureblob");
    assert!(data_sources[0]
        .credentials
        .connection_string
        .as_deref()
        .unwrap_or_default()
        .contains("AccountName=mock"));
}

#[tokio::test]
async fn test_invalid_credentials_fail_stage_without_panic() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_data_source: Some(SearchServiceError::request_failed(403, "Forbidden")),
        ..MockSearchProvider::new(log.clone())
    });
    // Real provider with an undecodable key: fails before any request is sent
    let blob = Arc::new(
        AzureBlobProvider::new(
            BlobStorageConfig::new("mockstorage", "not base64 !!")
                .with_endpoint("http://127.0.0.1:9/mockstorage"),
        )
        .unwrap(),
    );

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert!(!report.is_success());
    match report.stage(Stage::DataSource).and_then(|s| s.error()) {
        Some(ProvisionError::DataSourceRegistration(e)) => assert_eq!(e.status(), Some(403)),
        other => panic!("expected DataSourceRegistration, got {:?}", other),
    }
    // The registration was still attempted after the container step failed
    assert!(calls(&log).contains(&"put_data_source:catalog-blob-datasource".to_string()));
}

#[tokio::test]
async fn test_skillset_contains_exactly_enabled_skills() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search.clone(), blob).await;

    assert_eq!(
        report.stage(Stage::Skillset).and_then(|s| s.outcome()),
        Some(&StageOutcome::SkillsetRegistered { skills: 1 })
    );
    let skillsets = search.skillsets.lock().unwrap();
    assert_eq!(skillsets[0].name, "catalog-skillset");
    assert_eq!(skillsets[0].skills.len(), 1);
    assert_eq!(
        skillsets[0].skills[0].odata_type,
        "#Microsoft.Skills.Text.LanguageDetectionSkill"
    );
}

#[tokio::test]
async fn test_configured_skills_are_registered_in_order() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));
    let mut settings = test_settings();
    settings.pipeline.enabled_skills = vec![SkillKind::Split, SkillKind::Ocr, SkillKind::Merge];

    run_pipeline(&settings, search.clone(), blob).await;

    let skillsets = search.skillsets.lock().unwrap();
    let names: Vec<&str> = skillsets[0].skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["ocr", "merge", "split"]);
}

#[tokio::test]
async fn test_empty_skill_set_is_validation_failure() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));
    let mut settings = test_settings();
    settings.pipeline.enabled_skills.clear();

    let report = run_pipeline(&settings, search, blob).await;

    assert!(matches!(
        report.stage(Stage::Skillset).and_then(|s| s.error()),
        Some(ProvisionError::Validation(_))
    ));
    assert!(!calls(&log).iter().any(|c| c.starts_with("put_skillset")));
}

#[tokio::test]
async fn test_skillset_rejection_fails_stage() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_skillset: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert!(matches!(
        report.stage(Stage::Skillset).and_then(|s| s.error()),
        Some(ProvisionError::SkillsetRegistration(_))
    ));
    assert_eq!(report.exit_status(), 1);
}

#[tokio::test]
async fn test_indexer_is_deleted_before_create() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        indexer_exists: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search.clone(), blob).await;

    assert_eq!(
        report.stage(Stage::Indexer).and_then(|s| s.outcome()),
        Some(&StageOutcome::IndexerRecreated)
    );
    let recorded = calls(&log);
    assert!(position(&recorded, "delete_indexer:catalog-indexer")
        < position(&recorded, "create_indexer:catalog-indexer"));

    let indexers = search.indexers.lock().unwrap();
    assert_eq!(indexers[0].data_source_name, "catalog-blob-datasource");
    assert_eq!(indexers[0].target_index_name, "catalog-index");
    assert_eq!(indexers[0].skillset_name.as_deref(), Some("catalog-skillset"));
    assert_eq!(indexers[0].parameters.max_failed_items, -1);
    assert_eq!(indexers[0].parameters.max_failed_items_per_batch, -1);
}

#[tokio::test]
async fn test_missing_indexer_delete_is_skipped() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert_eq!(
        report.stage(Stage::Indexer).and_then(|s| s.outcome()),
        Some(&StageOutcome::IndexerCreated)
    );
    assert!(calls(&log).contains(&"create_indexer:catalog-indexer".to_string()));
}

#[tokio::test]
async fn test_indexer_delete_failure_prevents_create() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_delete_indexer: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert!(matches!(
        report.stage(Stage::Indexer).and_then(|s| s.error()),
        Some(ProvisionError::IndexerDeletion(_))
    ));
    assert!(!calls(&log).iter().any(|c| c.starts_with("create_indexer")));
}

#[tokio::test]
async fn test_indexer_creation_failure_fails_stage() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_create_indexer: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search.clone(), blob).await;

    match report.stage(Stage::Indexer).and_then(|s| s.error()) {
        Some(ProvisionError::IndexerCreation(e)) => assert_eq!(e.status(), Some(400)),
        other => panic!("expected IndexerCreation, got {:?}", other),
    }
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.exit_status(), 1);
    assert!(search.indexers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_best_effort_runs_every_stage_after_failure() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_create_index: true,
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert_eq!(report.failed(), 1);
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.skipped(), 0);
    assert!(calls(&log).contains(&"create_indexer:catalog-indexer".to_string()));
}

#[tokio::test]
async fn test_strict_mode_skips_after_first_failure() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider {
        fail_data_source: Some(SearchServiceError::request_failed(400, "Bad container")),
        ..MockSearchProvider::new(log.clone())
    });
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&strict_settings(), search, blob).await;

    assert!(!report.is_success());
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 2);
    assert!(matches!(
        report.stage(Stage::Skillset).map(|s| &s.status),
        Some(StageStatus::Skipped)
    ));
    assert!(matches!(
        report.stage(Stage::Indexer).map(|s| &s.status),
        Some(StageStatus::Skipped)
    ));

    let recorded = calls(&log);
    assert!(!recorded.iter().any(|c| c.starts_with("put_skillset")));
    assert!(!recorded.iter().any(|c| c.starts_with("delete_indexer")));
}

#[tokio::test]
async fn test_strict_mode_runs_everything_on_success() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&strict_settings(), search, blob).await;

    assert!(report.is_success());
    assert_eq!(report.succeeded(), 4);
}

#[tokio::test]
async fn test_verification_reads_resources_back() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));
    let mut settings = test_settings();
    settings.pipeline.verify = true;

    let report = run_pipeline(&settings, search, blob).await;

    assert!(report.is_success());
    assert_eq!(report.verification.len(), 4);
    assert_eq!(report.unverified(), 0);
    assert_eq!(
        report.verified(Stage::Index).map(|v| v.result.clone().ok()),
        Some(Some(ResourceCheck::Index { documents: 100 }))
    );
    assert_eq!(
        report.verified(Stage::Skillset).map(|v| v.result.clone().ok()),
        Some(Some(ResourceCheck::Skillset { skills: 1 }))
    );
    assert_eq!(
        report.verified(Stage::Indexer).map(|v| v.result.clone().ok()),
        Some(Some(ResourceCheck::Indexer {
            data_source: "catalog-blob-datasource".to_string(),
            target_index: "catalog-index".to_string(),
            skillset: Some("catalog-skillset".to_string()),
        }))
    );

    let recorded = calls(&log);
    for call in [
        "document_count:catalog-index",
        "get_data_source:catalog-blob-datasource",
        "get_skillset:catalog-skillset",
        "get_indexer:catalog-indexer",
    ] {
        assert!(
            position(&recorded, call) > position(&recorded, "create_indexer:catalog-indexer")
        );
    }
}

#[tokio::test]
async fn test_no_verification_by_default() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));

    let report = run_pipeline(&test_settings(), search, blob).await;

    assert!(report.verification.is_empty());
    assert!(!calls(&log).iter().any(|c| c.starts_with("get_indexer")));
}

#[tokio::test]
async fn test_custom_catalog_size() {
    let log = CallLog::default();
    let search = Arc::new(MockSearchProvider::new(log.clone()));
    let blob = Arc::new(MockBlobProvider::new(log.clone(), Ok(ContainerStatus::Created)));
    let mut settings = test_settings();
    settings.pipeline.catalog_size = 7;

    let report = run_pipeline(&settings, search.clone(), blob).await;

    assert_eq!(
        report.stage(Stage::Index).and_then(|s| s.outcome()),
        Some(&StageOutcome::IndexCreated { documents: 7 })
    );
    assert_eq!(search.uploaded.lock().unwrap().len(), 7);
}
