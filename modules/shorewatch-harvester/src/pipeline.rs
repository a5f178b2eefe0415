use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use shorewatch_common::{Config, ShorewatchError};

use crate::assemble::assemble;
use crate::enrich::{enrich, DETAIL_FETCH_CAP};
use crate::fetch::PageFetcher;
use crate::quality::validate;
use crate::store::{CacheStore, FEATURE_COLLECTION_KEY};
use crate::table::parse_table;

/// Counters for one harvest run.
#[derive(Debug, Default, Clone, Copy)]
pub struct HarvestStats {
    pub miles: usize,
    pub enriched: usize,
    pub with_image: usize,
    pub with_reports: usize,
}

impl fmt::Display for HarvestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} miles ({} enriched, {} with image, {} with reports)",
            self.miles, self.enriched, self.with_image, self.with_reports
        )
    }
}

/// One full harvest: fetch table → parse rows → enrich details → assemble →
/// validate → persist. Fatal conditions (transport errors, failed quality
/// gates) surface to the caller; nothing is retried, and a failed run leaves
/// the previously cached collection untouched.
pub struct Harvester {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn CacheStore>,
    source_table_url: String,
    detail_base_url: String,
}

impl Harvester {
    pub fn new(fetcher: Arc<dyn PageFetcher>, store: Arc<dyn CacheStore>, config: &Config) -> Self {
        Self {
            fetcher,
            store,
            source_table_url: config.source_table_url.clone(),
            detail_base_url: config.detail_base_url.clone(),
        }
    }

    pub async fn run(&self) -> Result<HarvestStats> {
        let run_id = Uuid::new_v4();
        info!(%run_id, url = self.source_table_url.as_str(), "Harvest run starting");

        let html = self
            .fetcher
            .fetch(&self.source_table_url)
            .await
            .context("Source table fetch failed")?;
        if html.trim().is_empty() {
            return Err(ShorewatchError::Scraping(format!(
                "empty response from {}",
                self.source_table_url
            ))
            .into());
        }

        let records = parse_table(&html, &self.detail_base_url);
        info!(%run_id, rows = records.len(), "Table parsed");

        let miles = enrich(records, self.fetcher.as_ref()).await?;

        let stats = HarvestStats {
            miles: miles.len(),
            enriched: miles.len().min(DETAIL_FETCH_CAP),
            with_image: miles.iter().filter(|m| m.image_url.is_some()).count(),
            with_reports: miles.iter().filter(|m| m.report_count.is_some()).count(),
        };

        let collection = assemble(miles, Utc::now());
        validate(&collection)?;

        let payload = serde_json::to_string(&collection)
            .context("Failed to serialize feature collection")?;
        self.store.put(FEATURE_COLLECTION_KEY, &payload).await?;

        info!(%run_id, "Harvest run complete. {stats}");
        Ok(stats)
    }
}
