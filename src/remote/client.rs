use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use passsync_common::{Error, Result};

use crate::config::RemoteConfig;
use crate::remote::types::{PassImageLink, RemotePass};

/// Storage bucket holding uploaded pass images.
const STORAGE_BUCKET: &str = "passes";
/// Key prefix inside the bucket.
const STORAGE_PREFIX: &str = "images";

/// Remote backend operations the sync engine depends on.
///
/// Implemented by [`SupabaseClient`] in production and by an in-memory mock
/// in the engine tests.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Check whether a pass record with this id already exists remotely.
    async fn pass_exists(&self, id: i64) -> Result<bool>;

    /// Insert a pass record into the `passes` collection.
    async fn insert_pass(&self, pass: &RemotePass) -> Result<()>;

    /// Insert an image link record into the `passes_images` collection.
    async fn insert_image_link(&self, link: &PassImageLink) -> Result<()>;

    /// Upload image bytes into the storage bucket.
    async fn upload_image(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct PassIdRow {
    #[allow(dead_code)]
    id: i64,
}

/// Supabase REST client: PostgREST for records, the storage API for objects.
///
/// Every request carries the service key as both the `apikey` header and a
/// bearer token.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &RemoteConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn rest_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    fn storage_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}/{}",
            self.base_url, STORAGE_BUCKET, STORAGE_PREFIX, name
        )
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Turn a non-2xx response into `Error::Remote` with status and body.
    async fn check_status(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::remote(format!("{}: {} {}", context, status, body)))
    }
}

#[async_trait]
impl RemoteStore for SupabaseClient {
    async fn pass_exists(&self, id: i64) -> Result<bool> {
        let url = self.rest_url("passes");
        tracing::debug!(pass_id = id, "checking pass existence");

        let resp = self
            .authed(self.client.get(&url))
            .query(&[("id", format!("eq.{}", id)), ("select", "id".to_string())])
            .send()
            .await
            .map_err(|e| Error::remote(format!("existence check failed: {}", e)))?;

        let rows: Vec<PassIdRow> = Self::check_status(resp, "existence check")
            .await?
            .json()
            .await
            .map_err(|e| Error::remote(format!("existence check returned bad body: {}", e)))?;

        Ok(!rows.is_empty())
    }

    async fn insert_pass(&self, pass: &RemotePass) -> Result<()> {
        let resp = self
            .authed(self.client.post(self.rest_url("passes")))
            .header("Prefer", "return=minimal")
            .json(pass)
            .send()
            .await
            .map_err(|e| Error::remote(format!("pass insert failed: {}", e)))?;

        Self::check_status(resp, "pass insert").await?;
        Ok(())
    }

    async fn insert_image_link(&self, link: &PassImageLink) -> Result<()> {
        let resp = self
            .authed(self.client.post(self.rest_url("passes_images")))
            .header("Prefer", "return=minimal")
            .json(link)
            .send()
            .await
            .map_err(|e| Error::remote(format!("image link insert failed: {}", e)))?;

        Self::check_status(resp, "image link insert").await?;
        Ok(())
    }

    async fn upload_image(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let resp = self
            .authed(self.client.post(self.storage_url(name)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| Error::remote(format!("image upload failed: {}", e)))?;

        Self::check_status(resp, "image upload").await?;
        Ok(())
    }
}
