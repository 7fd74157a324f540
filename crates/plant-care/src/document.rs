/// Process-lifetime cache of the extracted guide text.
///
/// Only the extracted text is kept, never the downloaded bytes. Entries are keyed by
/// source URL and expire after the configured TTL. Failed loads are not cached, so the
/// next render retries; `invalidate` forces a reload.
use std::sync::{Arc, RwLock};
use std::time::Instant;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::DocumentConfig;
use crate::error::AppError;
use crate::extract::extract_text_blocking;
use crate::fetch::PdfFetcher;

#[derive(Debug, Clone)]
pub struct Document {
    pub url: String,
    pub text: String,
    /// SHA-256 of the PDF bytes the text came from.
    pub digest: String,
    pub pages: usize,
    pub loaded_at: Instant,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub url: String,
    pub cached: bool,
    pub digest: Option<String>,
    pub pages: Option<usize>,
    pub age_secs: Option<u64>,
    pub ttl_secs: Option<u64>,
}

pub struct DocumentStore {
    fetcher: PdfFetcher,
    config: DocumentConfig,
    /// Single-flight guard: only one fetch and extraction runs at a time.
    loading: Mutex<()>,
    /// Held only to read or swap the pointer, never across a load.
    cached: RwLock<Option<Arc<Document>>>,
}

impl DocumentStore {
    pub fn new(fetcher: PdfFetcher, config: DocumentConfig) -> Self {
        Self {
            fetcher,
            config,
            loading: Mutex::new(()),
            cached: RwLock::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Return the guide text, fetching and extracting it if the cache is cold or stale.
    ///
    /// Concurrent cold requests queue on the loading guard and share the first
    /// request's result. Readers of [`status`](Self::status) never wait on a load.
    pub async fn load(&self) -> Result<Arc<Document>, AppError> {
        if let Some(doc) = self.fresh_snapshot() {
            debug!(url = %doc.url, "document cache hit");
            return Ok(doc);
        }

        let _guard = self.loading.lock().await;
        // Another request may have finished loading while we waited.
        if let Some(doc) = self.fresh_snapshot() {
            debug!(url = %doc.url, "document loaded by a concurrent request");
            return Ok(doc);
        }

        self.replace(None);
        let doc = Arc::new(self.fetch_and_extract().await?);
        if self.config.cache_ttl.is_some() {
            self.replace(Some(Arc::clone(&doc)));
        }
        Ok(doc)
    }

    pub fn invalidate(&self) {
        if self.replace(None).is_some() {
            info!(url = %self.config.url, "document cache invalidated");
        }
    }

    pub fn status(&self) -> CacheStatus {
        let doc = self.fresh_snapshot();
        CacheStatus {
            url: self.config.url.clone(),
            cached: doc.is_some(),
            digest: doc.as_ref().map(|d| d.digest.clone()),
            pages: doc.as_ref().map(|d| d.pages),
            age_secs: doc.as_ref().map(|d| d.loaded_at.elapsed().as_secs()),
            ttl_secs: self.config.cache_ttl.map(|t| t.as_secs()),
        }
    }

    fn fresh_snapshot(&self) -> Option<Arc<Document>> {
        // A poisoned lock still holds a valid `Option<Arc<_>>`.
        let slot = self.cached.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|doc| doc.url == self.config.url && self.is_fresh(doc))
            .map(Arc::clone)
    }

    fn replace(&self, doc: Option<Arc<Document>>) -> Option<Arc<Document>> {
        let mut slot = self.cached.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *slot, doc)
    }

    fn is_fresh(&self, doc: &Document) -> bool {
        self.config
            .cache_ttl
            .is_some_and(|ttl| doc.loaded_at.elapsed() < ttl)
    }

    async fn fetch_and_extract(&self) -> Result<Document, AppError> {
        let url = self.config.url.clone();
        let bytes = self
            .fetcher
            .fetch(&url)
            .await
            .inspect_err(|e| warn!(url = %url, error = %e, "PDF fetch failed"))?;
        let digest = sha256_hex(&bytes);

        let extracted = extract_text_blocking(bytes)
            .await
            .inspect_err(|e| warn!(url = %url, error = %e, "PDF text extraction failed"))?;

        info!(
            url = %url,
            digest = %digest,
            pages = extracted.pages,
            chars = extracted.text.chars().count(),
            "document loaded"
        );

        Ok(Document {
            url,
            text: extracted.text,
            digest,
            pages: extracted.pages,
            loaded_at: Instant::now(),
        })
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
