// src/storage/framer_client.rs
//! Framer CMS client for reading certificate collections.
//!
//! Provides read-only access to one collection of the external content store:
//! - Bearer-token authentication
//! - Cache-bypassing GET of up to [`PAGE_LIMIT`] items
//! - Tolerant decoding of the `items` array
//!
//! # Behavior
//! - Exactly one request per call, no retries
//! - No client-side timeout; the hosting environment bounds request lifetime
//! - Non-success statuses surface as [`VerifyError::Upstream`] with the body attached

use crate::error::VerifyError;
use crate::settings::FramerCredentials;
use crate::utils::serialization::deserialize;
use anyhow::anyhow;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Url};
use serde_json::Value;

/// Maximum number of items requested from the collection.
pub const PAGE_LIMIT: u32 = 1000;

/// Read-only client for a single Framer collection.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone, Debug)]
pub struct FramerClient {
    /// Shared HTTP client
    http: Client,
    /// Fully-built items endpoint, including the `limit` query
    items_url: Url,
    /// Bearer token
    api_key: String,
}

impl FramerClient {
    /// Creates a client for the collection named in `credentials`.
    ///
    /// # Arguments
    /// * `api_base` - Base URL of the Framer API (e.g. `https://api.framer.com`)
    /// * `credentials` - Site, collection and token
    ///
    /// # Errors
    /// Fails if `api_base` cannot carry a path or the HTTP client cannot be
    /// constructed. Both are startup problems, not request failures.
    pub fn new(api_base: &Url, credentials: &FramerCredentials) -> anyhow::Result<Self> {
        let items_url = Self::items_url(api_base, &credentials.site_id, &credentials.collection_id)?;
        let http = Client::builder().build()?;

        Ok(Self {
            http,
            items_url,
            api_key: credentials.api_key.clone(),
        })
    }

    /// Builds `{base}/v1/sites/{site}/collections/{collection}/items?limit=1000`.
    ///
    /// Site and collection identifiers are percent-encoded as single path segments.
    fn items_url(api_base: &Url, site_id: &str, collection_id: &str) -> anyhow::Result<Url> {
        let mut url = api_base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("cannot use {} as an API base", api_base))?
            .pop_if_empty()
            .extend(["v1", "sites", site_id, "collections", collection_id, "items"]);
        url.query_pairs_mut()
            .clear()
            .append_pair("limit", &PAGE_LIMIT.to_string());
        Ok(url)
    }

    /// The endpoint this client reads from.
    pub fn endpoint(&self) -> &Url {
        &self.items_url
    }

    /// Fetches the raw items of the collection.
    ///
    /// # Returns
    /// - `Ok(items)` with every entry of the response's `items` array; an absent
    ///   or `null` array yields an empty vector
    /// - `Err(Upstream)` on a non-success status
    /// - `Err(Http | Json | MalformedResponse)` on transport or decoding failure
    pub async fn list_items(&self) -> Result<Vec<Value>, VerifyError> {
        let response = self
            .http
            .get(self.items_url.clone())
            .bearer_auth(&self.api_key)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VerifyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let data: Value = deserialize(&text)?;

        match data.get("items") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(other) => Err(VerifyError::MalformedResponse(format!(
                "expected `items` to be an array, got {}",
                json_kind(other)
            ))),
        }
    }
}

/// Short description of a JSON value's type for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
