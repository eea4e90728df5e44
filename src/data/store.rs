//! Observation store client.
//!
//! The store is an external document collection. We only read from it:
//!
//! - `GET {base}/collections/{name}`: every document in a collection
//! - `GET {base}/series/{id}`: the document(s) for one series identifier
//!
//! Bodies are returned as raw JSON; normalization happens in `io::ingest`.

use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::data::{env_base_url, http_client};
use crate::error::AppError;
use crate::io::ingest::documents_from_value;

pub const STORE_URL_VAR: &str = "TRENDS_STORE_URL";

/// Default collection for the materials grid.
pub const MATERIALS_COLLECTION: &str = "materialTrends";
/// Default collection for the consumer indicator dashboard.
pub const CONSUMER_COLLECTION: &str = "Consumer Spending Indicators";

pub struct StoreClient {
    client: Client,
    base_url: String,
}

impl StoreClient {
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = env_base_url(STORE_URL_VAR)?;
        Ok(Self {
            client: http_client()?,
            base_url,
        })
    }

    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Every document of a collection.
    pub fn fetch_collection(&self, collection: &str) -> Result<Vec<Value>, AppError> {
        let url = self.endpoint(&["collections", collection])?;
        let body = self.get_json(url)?;
        let docs = documents_from_value(body).map_err(|msg| AppError::new(4, format!("Store response: {msg}")))?;
        info!(collection, documents = docs.len(), "fetched collection");
        Ok(docs)
    }

    /// The document(s) stored under one series identifier.
    pub fn fetch_series(&self, series_id: &str) -> Result<Vec<Value>, AppError> {
        let url = self.endpoint(&["series", series_id])?;
        let docs = match self.get_json(url)? {
            obj @ Value::Object(_) if obj.get("documents").is_none() => vec![obj],
            other => documents_from_value(other).map_err(|msg| AppError::new(4, format!("Store response: {msg}")))?,
        };
        if docs.is_empty() {
            return Err(AppError::new(4, format!("No documents returned for series {series_id}.")));
        }
        debug!(series_id, documents = docs.len(), "fetched series");
        Ok(docs)
    }

    /// `{base}/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::new(2, format!("Invalid {STORE_URL_VAR} '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::new(2, format!("{STORE_URL_VAR} '{}' cannot take a path.", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json(&self, url: Url) -> Result<Value, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(4, format!("Store request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Store request failed with status {}.", resp.status()),
            ));
        }

        resp.json()
            .map_err(|e| AppError::new(4, format!("Failed to parse store response: {e}")))
    }
}

/// Percent-encode a path segment (collection names contain spaces).
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_encode_each_segment() {
        let client = StoreClient::new(Client::new(), "http://localhost:9000");
        let url = client.endpoint(&["collections", "Consumer Spending Indicators"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/collections/Consumer%20Spending%20Indicators");

        let url = client.endpoint(&["series", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/series/a%2Fb");
    }

    #[test]
    fn endpoints_keep_a_base_path() {
        let client = StoreClient::new(Client::new(), "https://example.org/api/");
        let url = client.endpoint(&["series", "WPU057303"]).unwrap();
        assert_eq!(url.as_str(), "https://example.org/api/series/WPU057303");
    }

    #[test]
    fn unparseable_base_url_is_a_config_error() {
        let client = StoreClient::new(Client::new(), "not a url");
        assert_eq!(client.endpoint(&["series", "x"]).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn trims_trailing_slash_from_base() {
        let client = StoreClient::new(Client::new(), "http://localhost:9000/");
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
