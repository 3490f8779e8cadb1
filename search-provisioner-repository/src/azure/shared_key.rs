//! Shared Key authorization for Azure Blob Storage.
//!
//! Signs requests with HMAC-SHA256 over the canonical string described by the
//! storage service: the verb, eleven standard headers, the `x-ms-*` headers
//! and the canonicalized resource.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::errors::SearchServiceError;

type HmacSha256 = Hmac<Sha256>;

/// A storage account name together with its decoded key.
#[derive(Clone)]
pub struct SharedKeyCredential {
    account_name: String,
    key: Vec<u8>,
}

impl std::fmt::Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedKeyCredential")
            .field("account_name", &self.account_name)
            .finish_non_exhaustive()
    }
}

impl SharedKeyCredential {
    /// Decode a base64 account key.
    ///
    /// # Returns
    ///
    /// * `Ok(SharedKeyCredential)` - If the key is valid base64
    /// * `Err(SearchServiceError::AuthenticationError)` - Otherwise
    pub fn new(account_name: &str, account_key: &str) -> Result<Self, SearchServiceError> {
        if account_name.is_empty() {
            return Err(SearchServiceError::authentication(
                "Storage account name is empty",
            ));
        }
        let key = STANDARD.decode(account_key.trim()).map_err(|e| {
            SearchServiceError::authentication(format!(
                "Storage account key is not valid base64: {}",
                e
            ))
        })?;
        if key.is_empty() {
            return Err(SearchServiceError::authentication(
                "Storage account key is empty",
            ));
        }

        Ok(Self {
            account_name: account_name.to_string(),
            key,
        })
    }

    /// Build the string to sign for a request.
    ///
    /// `ms_headers` are the `x-ms-*` headers sent with the request, in any
    /// order. A zero content length is signed as an empty string.
    pub fn string_to_sign(
        &self,
        method: &str,
        content_length: usize,
        ms_headers: &[(&str, &str)],
        url: &Url,
    ) -> String {
        let content_length = if content_length == 0 {
            String::new()
        } else {
            content_length.to_string()
        };

        // Content-Encoding, Content-Language, Content-Length, Content-MD5,
        // Content-Type, Date, If-Modified-Since, If-Match, If-None-Match,
        // If-Unmodified-Since, Range
        let standard_headers = [
            "",
            "",
            content_length.as_str(),
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ];

        let mut out = String::new();
        out.push_str(&method.to_uppercase());
        out.push('\n');
        for header in standard_headers {
            out.push_str(header);
            out.push('\n');
        }
        out.push_str(&Self::canonicalized_headers(ms_headers));
        out.push_str(&self.canonicalized_resource(url));
        out
    }

    fn canonicalized_headers(ms_headers: &[(&str, &str)]) -> String {
        let mut headers: Vec<(String, String)> = ms_headers
            .iter()
            .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
            .filter(|(name, _)| name.starts_with("x-ms-"))
            .collect();
        headers.sort();

        headers
            .into_iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect()
    }

    fn canonicalized_resource(&self, url: &Url) -> String {
        let mut resource = format!("/{}{}", self.account_name, url.path());

        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_lowercase(), v.into_owned()))
            .collect();
        params.sort();

        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (name, value) in params {
            match grouped.last_mut() {
                Some((last, values)) if *last == name => values.push(value),
                _ => grouped.push((name, vec![value])),
            }
        }

        for (name, values) in grouped {
            resource.push('\n');
            resource.push_str(&name);
            resource.push(':');
            resource.push_str(&values.join(","));
        }
        resource
    }

    /// Sign a string with the account key.
    pub fn sign(&self, string_to_sign: &str) -> Result<String, SearchServiceError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| SearchServiceError::authentication(e.to_string()))?;
        mac.update(string_to_sign.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Value of the `Authorization` header for a request.
    pub fn authorization(
        &self,
        method: &str,
        content_length: usize,
        ms_headers: &[(&str, &str)],
        url: &Url,
    ) -> Result<String, SearchServiceError> {
        let string_to_sign = self.string_to_sign(method, content_length, ms_headers, url);
        let signature = self.sign(&string_to_sign)?;
        Ok(format!("SharedKey {}:{}", self.account_name, signature))
    }
}
