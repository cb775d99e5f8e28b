//! Managed table store client
//!
//! Wraps the external key-value table service behind the [`KeyValueStore`]
//! trait so handlers stay decoupled from the wire API. The production
//! implementation speaks the table service's REST API over a single
//! long-lived `reqwest` client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

/// Item stored in the external table, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
}

/// Table metadata returned by a describe probe.
#[derive(Debug, Deserialize)]
pub struct TableDescription {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub item_count: Option<u64>,
}

/// Point read/write access to the external key-value table service.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Unconditional overwrite keyed by `item.id`.
    async fn put(&self, item: &Item) -> Result<()>;

    /// Point lookup; `None` when no record matches.
    async fn get(&self, id: &str) -> Result<Option<Item>>;

    /// Lightweight metadata probe used by the healthcheck.
    async fn describe(&self) -> Result<TableDescription>;
}

/// REST client for the managed table API.
#[derive(Debug, Clone)]
pub struct HttpTableStore {
    http_client: Client,
    base_url: String,
    api_token: String,
    table_name: String,
}

impl HttpTableStore {
    /// Build a store client from `TABLE_API_URL`, `TABLE_API_TOKEN` and
    /// `TABLE_NAME` (default `Items`).
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("TABLE_API_URL").context("TABLE_API_URL must be set")?;
        let api_token = env::var("TABLE_API_TOKEN").context("TABLE_API_TOKEN must be set")?;
        let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "Items".to_string());

        let http_client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        info!("Table store client initialized (table: {})", table_name);

        Ok(Self::new(http_client, base_url, api_token, table_name))
    }

    pub fn new(
        http_client: Client,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            table_name: table_name.into(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/v1/tables/{}", self.base_url, self.table_name)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/items/{}", self.table_url(), urlencoding::encode(id))
    }
}

#[async_trait]
impl KeyValueStore for HttpTableStore {
    async fn put(&self, item: &Item) -> Result<()> {
        let response = self
            .http_client
            .put(self.item_url(&item.id))
            .bearer_auth(&self.api_token)
            .json(item)
            .send()
            .await
            .context("Table API unreachable")?;

        if !response.status().is_success() {
            anyhow::bail!("Table API returned status: {}", response.status());
        }

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>> {
        let response = self
            .http_client
            .get(self.item_url(id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("Table API unreachable")?;

        // 404 means "no record", not a store failure
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            anyhow::bail!("Table API returned status: {}", response.status());
        }

        let item = response
            .json::<Item>()
            .await
            .context("Failed to decode item record")?;

        Ok(Some(item))
    }

    async fn describe(&self) -> Result<TableDescription> {
        let response = self
            .http_client
            .get(self.table_url())
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("Table API unreachable")?;

        if !response.status().is_success() {
            anyhow::bail!("Table API returned status: {}", response.status());
        }

        response
            .json::<TableDescription>()
            .await
            .context("Failed to decode table description")
    }
}
