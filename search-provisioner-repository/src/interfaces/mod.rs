//! Interface definitions for the remote services.
//!
//! This module defines the abstract `SearchServiceProvider` and
//! `BlobContainerProvider` traits that allow for dependency injection and
//! mock implementations in tests.

mod blob_container_provider;
mod search_service_provider;

pub use blob_container_provider::{BlobContainerProvider, ContainerStatus};
pub use search_service_provider::SearchServiceProvider;
