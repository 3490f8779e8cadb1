//! Utility functions for the search provisioner repository.

use crate::errors::SearchServiceError;

/// Build the storage connection string a blob data source authenticates with.
///
/// # Example
///
/// ```
/// use search_provisioner_repository::storage_connection_string;
///
/// let conn = storage_connection_string("contoso", "a2V5");
/// assert!(conn.contains("AccountName=contoso;"));
/// ```
pub fn storage_connection_string(account_name: &str, account_key: &str) -> String {
    format!(
        "DefaultEndpointsProtocol=https;AccountName={};AccountKey={};EndpointSuffix=core.windows.net",
        account_name, account_key
    )
}

/// Reject empty resource names before a request is built.
///
/// The name ends up as a URL path segment, so an empty one would address the
/// collection instead of the resource.
pub fn validate_resource_name(kind: &str, name: &str) -> Result<(), SearchServiceError> {
    if name.trim().is_empty() {
        return Err(SearchServiceError::validation(format!(
            "{} name cannot be empty",
            kind
        )));
    }
    if name.contains('/') {
        return Err(SearchServiceError::validation(format!(
            "{} name '{}' cannot contain '/'",
            kind, name
        )));
    }
    Ok(())
}
