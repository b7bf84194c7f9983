use chrono::NaiveDate;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::config::{render_template, Config, LocationConfig};
use crate::error::{MenuError, Result};
use crate::extractors::{FetchMode, MenuExtractor};
use crate::models::{ContentKind, RawSourcePayload};
use crate::utils::browser::{render_page, BrowserLauncher};
use crate::utils::http::fetch_with_retry;

/// Retrieves the raw document for one location, over plain HTTP or through a
/// freshly launched browser session.
pub struct SourceFetcher {
    config: Arc<Config>,
    client: Client,
    launcher: Arc<dyn BrowserLauncher>,
}

impl SourceFetcher {
    pub fn new(config: Arc<Config>, client: Client, launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            config,
            client,
            launcher,
        }
    }

    /// The concrete URL for `location` on `today`.
    pub fn source_url(
        &self,
        location: &LocationConfig,
        extractor: &dyn MenuExtractor,
        today: NaiveDate,
    ) -> Result<Url> {
        let mut params = vec![
            ("weekday", self.config.weekday_name(today).to_string()),
            ("date", today.format("%Y-%m-%d").to_string()),
        ];
        params.extend(extractor.url_params(today));

        let rendered = render_template(&location.url, &params);
        Url::parse(&rendered).map_err(|e| MenuError::fetch(format!("invalid url {rendered:?}: {e}")))
    }

    pub async fn fetch(
        &self,
        location: &LocationConfig,
        extractor: &dyn MenuExtractor,
        today: NaiveDate,
    ) -> Result<RawSourcePayload> {
        let url = self.source_url(location, extractor, today)?;
        info!("URL: {}", url);

        let body = match location.family.fetch_mode() {
            FetchMode::Http => {
                let response =
                    fetch_with_retry(&self.client, url.as_str(), self.config.http.max_attempts).await?;
                response.text().await?
            }
            FetchMode::Browser => {
                let wait_limit = Duration::from_secs(self.config.browser.wait_timeout_secs);
                render_page(
                    self.launcher.as_ref(),
                    url.as_str(),
                    &self.config.rendered_table,
                    wait_limit,
                )
                .await?
            }
        };

        Ok(match extractor.content_kind() {
            ContentKind::Html => RawSourcePayload::html(body),
            ContentKind::Json => RawSourcePayload::json(body),
        })
    }
}
