use crate::config::SeisoConfig;
use crate::error::{ImportError, Result};
use crate::mapper::MappedItem;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Destination for mapped item collections. One call per collection; failure
/// semantics (retries, backoff) are the implementation's concern, not the
/// importer's.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn put_items(&self, item_type: &str, items: Vec<MappedItem>) -> Result<()>;
}

/// HTTP connector that PUTs mapped collections to a Seiso instance.
pub struct SeisoConnector {
    client: reqwest::Client,
    base_uri: String,
    username: Option<String>,
    password: Option<String>,
}

impl SeisoConnector {
    pub fn new(config: &SeisoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_uri: config.base_uri.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    // Collection URL for bulk puts. Built directly rather than via
    // UriFactory::type_uri, because detached ip-address-roles are persisted
    // as a collection even though they have no addressable top-level URI.
    fn items_url(&self, item_type: &str) -> String {
        format!("{}/v1/{}", self.base_uri, item_type)
    }
}

#[async_trait]
impl ItemStore for SeisoConnector {
    async fn put_items(&self, item_type: &str, items: Vec<MappedItem>) -> Result<()> {
        let url = self.items_url(item_type);
        info!(item_type, count = items.len(), "Putting items");

        let mut request = self.client.put(&url).json(&items);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::Api {
                message: format!("PUT {url} returned {status}: {body}"),
            });
        }

        debug!(item_type, "Put succeeded");
        Ok(())
    }
}

/// In-memory store for development/testing. Records each `put_items` call in
/// order so tests can assert on collection ordering.
#[derive(Default)]
pub struct InMemoryStore {
    puts: Arc<Mutex<Vec<(String, Vec<MappedItem>)>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded `put_items` calls, in call order.
    pub fn puts(&self) -> Vec<(String, Vec<MappedItem>)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn put_items(&self, item_type: &str, items: Vec<MappedItem>) -> Result<()> {
        debug!(item_type, count = items.len(), "Recording items");
        let mut puts = self.puts.lock().unwrap();
        puts.push((item_type.to_string(), items));
        Ok(())
    }
}
