use anyhow::Result as AnyResult;
use chrono::{Local, NaiveDate};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info};

use crate::aligner::align;
use crate::config::{Config, LocationConfig};
use crate::error::{LocationError, Result};
use crate::extractors::ExtractContext;
use crate::fetcher::SourceFetcher;
use crate::models::{MenuLine, MenuTable};
use crate::utils::browser::{BrowserLauncher, ChromiumLauncher};
use crate::utils::http::create_client;

/// Outcome of one run: every location that worked, and why the others did not.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub table: MenuTable,
    pub errors: Vec<LocationError>,
}

pub struct Aggregator {
    config: Arc<Config>,
    fetcher: SourceFetcher,
}

impl Aggregator {
    pub fn new(config: Arc<Config>, fetcher: SourceFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Wire up the HTTP client and the Chromium launcher from `config`.
    pub fn from_config(config: Arc<Config>) -> AnyResult<Self> {
        let client = create_client(&config.http)?;
        let launcher: Arc<dyn BrowserLauncher> =
            Arc::new(ChromiumLauncher::new(config.browser.clone()));
        let fetcher = SourceFetcher::new(config.clone(), client, launcher);
        Ok(Self::new(config, fetcher))
    }

    pub async fn collect(&self) -> Aggregation {
        self.collect_for(Local::now().date_naive()).await
    }

    /// Run every enabled location for `today`. Failures stay per location.
    pub async fn collect_for(&self, today: NaiveDate) -> Aggregation {
        let concurrency = self.config.aggregator.concurrency.max(1);

        let results: Vec<_> = stream::iter(self.config.enabled_locations())
            .map(|location| async move { (location.id, self.process(location, today).await) })
            .buffered(concurrency)
            .collect()
            .await;

        let mut aggregation = Aggregation::default();
        for (location, result) in results {
            match result {
                Ok(lines) => {
                    info!("Found {} dishes for {}", lines.len(), location);
                    aggregation.table.insert(location, lines);
                }
                Err(e) => {
                    error!("Failed to get menu for {}: {}", location, e);
                    aggregation.errors.push(LocationError { location, error: e });
                }
            }
        }

        aggregation
    }

    /// Fetch, extract, normalize and align a single location.
    pub async fn process(&self, location: &LocationConfig, today: NaiveDate) -> Result<Vec<MenuLine>> {
        info!("Getting menu for {}...", location.id);

        let extractor = location.family.extractor(self.config.clone());
        let payload = self.fetcher.fetch(location, extractor.as_ref(), today).await?;

        let ctx = ExtractContext { location, today };
        let extracted = extractor.extract(payload, &ctx)?.normalized();

        align(location.id, extracted)
    }
}
