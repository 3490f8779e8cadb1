//! Error types for the search provisioner repository.
//!
//! This module provides a unified error type for all search service and blob
//! storage operations.

mod search_service_error;

pub use search_service_error::SearchServiceError;
