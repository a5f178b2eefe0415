// Test doubles for the harvest pipeline seams.
//
// - MockFetcher (PageFetcher) — HashMap-based URL→HTML, errors on misses
// - CountingFetcher (PageFetcher) — one fixed page, records every request
// - MemoryCacheStore (CacheStore) — in-memory map that records puts

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use shorewatch_common::ShorewatchError;

use crate::fetch::PageFetcher;
use crate::store::CacheStore;

/// HashMap-based page fetcher. Returns `Err` for unregistered URLs.
/// Builder pattern: `.on_page(url, html)`.
pub struct MockFetcher {
    pages: HashMap<String, String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn on_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockFetcher: no page registered for {url}"))
    }
}

/// Serves the same page for every URL and records the request order.
pub struct CountingFetcher {
    page: String,
    calls: Mutex<Vec<String>>,
}

impl CountingFetcher {
    pub fn new(page: &str) -> Self {
        Self {
            page: page.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(self.page.clone())
    }
}

/// In-memory cache store. Records every `put` so tests can assert a failed
/// run never reached the cache.
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
    puts: Mutex<u32>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            puts: Mutex::new(0),
        }
    }

    /// Pre-seed a previously persisted value.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn put_count(&self) -> u32 {
        *self.puts.lock().unwrap()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ShorewatchError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), ShorewatchError> {
        *self.puts.lock().unwrap() += 1;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
