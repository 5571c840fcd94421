//! Supabase backend for the ODC admin tools.
//!
//! Records live in the `formations` and `events` tables behind PostgREST;
//! images live in a public Storage bucket. Every request carries the
//! project's anon key as both `apikey` and bearer token.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use odc_core::config::SupabaseConfig;
use odc_core::error::{OdcError, OdcResult};
use odc_core::event::Event;
use odc_core::formation::Formation;
use odc_core::image::ImageStore;
use odc_core::store::RecordStore;

pub const FORMATIONS_TABLE: &str = "formations";
pub const EVENTS_TABLE: &str = "events";

pub struct SupabaseStore {
    client: Client,
    base_url: String,
    bucket: String,
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.anon_key).context("Invalid Supabase anon key")?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key))
            .context("Invalid Supabase anon key")?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(SupabaseStore {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    fn public_prefix(&self) -> String {
        format!("{}/storage/v1/object/public/{}/", self.base_url, self.bucket)
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_prefix(), path)
    }

    /// All rows of `table`, oldest start date first.
    pub async fn fetch<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.rest_url(table))
            .query(&[("select", "*"), ("order", "date_start.asc")])
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", table))?;

        let rows: Vec<T> = ensure_success(response, table)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} rows", table))?;

        debug!(table, rows = rows.len(), "fetched rows");
        Ok(rows)
    }

    /// Insert or update by primary key and return the stored row.
    pub async fn upsert<T: Serialize + DeserializeOwned>(&self, table: &str, row: &T) -> Result<T> {
        let response = self
            .client
            .post(self.rest_url(table))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(row)
            .send()
            .await
            .with_context(|| format!("Failed to save to {}", table))?;

        let mut rows: Vec<T> = ensure_success(response, table)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse saved {} row", table))?;

        if rows.is_empty() {
            bail!("Saving to {} returned no row", table);
        }
        Ok(rows.remove(0))
    }

    /// Delete the row with `id`. Returns how many rows were removed.
    pub async fn delete(&self, table: &str, id: &str) -> Result<usize> {
        let response = self
            .client
            .delete(self.rest_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .send()
            .await
            .with_context(|| format!("Failed to delete {} from {}", id, table))?;

        let rows: Vec<Value> = ensure_success(response, table)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse delete response from {}", table))?;
        Ok(rows.len())
    }

    /// Cheap query proving the URL and key are accepted.
    pub async fn test_connection(&self) -> Result<()> {
        let response = self
            .client
            .get(self.rest_url(FORMATIONS_TABLE))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .context("Failed to reach Supabase")?;
        ensure_success(response, "connection test").await?;
        info!(url = %self.base_url, "supabase connection ok");
        Ok(())
    }

    pub async fn bucket_exists(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/storage/v1/bucket/{}", self.base_url, self.bucket))
            .send()
            .await
            .context("Failed to query storage bucket")?;

        if response.status().is_success() {
            return Ok(true);
        }
        // Storage answers a missing bucket with 400 or 404 depending on version.
        if matches!(response.status().as_u16(), 400 | 404) {
            return Ok(false);
        }
        ensure_success(response, "bucket lookup").await?;
        Ok(false)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Supabase request for {} failed ({}): {}", what, status, body);
    }
    Ok(response)
}

fn store_error(e: anyhow::Error) -> OdcError {
    OdcError::Store(format!("{:#}", e))
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn fetch_formation_rows(&self) -> OdcResult<Vec<Value>> {
        self.fetch(FORMATIONS_TABLE).await.map_err(store_error)
    }

    async fn fetch_event_rows(&self) -> OdcResult<Vec<Value>> {
        self.fetch(EVENTS_TABLE).await.map_err(store_error)
    }

    async fn save_formation(&self, formation: &Formation) -> OdcResult<Formation> {
        self.upsert(FORMATIONS_TABLE, formation).await.map_err(store_error)
    }

    async fn delete_formation(&self, id: &str) -> OdcResult<()> {
        match self.delete(FORMATIONS_TABLE, id).await.map_err(store_error)? {
            0 => Err(OdcError::NotFound(id.to_string())),
            _ => Ok(()),
        }
    }

    async fn save_event(&self, event: &Event) -> OdcResult<Event> {
        self.upsert(EVENTS_TABLE, event).await.map_err(store_error)
    }

    async fn delete_event(&self, id: &str) -> OdcResult<()> {
        match self.delete(EVENTS_TABLE, id).await.map_err(store_error)? {
            0 => Err(OdcError::NotFound(id.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ImageStore for SupabaseStore {
    async fn upload_image(&self, path: &str, content_type: &str, bytes: &[u8]) -> OdcResult<String> {
        let response = self
            .client
            .post(self.object_url(path))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes.to_vec())
            .send()
            .await
            .with_context(|| format!("Failed to upload {}", path))
            .map_err(store_error)?;
        ensure_success(response, path).await.map_err(store_error)?;

        debug!(path, bucket = %self.bucket, "image stored");
        Ok(self.public_url(path))
    }

    async fn delete_image(&self, path: &str) -> OdcResult<()> {
        let response = self
            .client
            .delete(self.object_url(path))
            .send()
            .await
            .with_context(|| format!("Failed to delete {}", path))
            .map_err(store_error)?;
        ensure_success(response, path).await.map_err(store_error)?;
        Ok(())
    }

    fn path_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_prefix())
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }
}
