use anyhow::Result;
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::HttpConfig;
use crate::error::MenuError;

pub fn create_client(settings: &HttpConfig) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(&settings.user_agent)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .pool_max_idle_per_host(6)
        .build()?;

    Ok(client)
}

/// GET `url`, retrying network failures and non-success statuses with
/// exponential backoff. `max_attempts = 1` means a single try.
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    max_attempts: u32,
) -> std::result::Result<Response, MenuError> {
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_attempts {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return Ok(response);
                }
                let status = response.status();
                warn!("HTTP error {}: {}", status, url);
                last_error = Some(format!("HTTP error: {}", status));
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                last_error = Some(e.to_string());
            }
        }

        attempts += 1;
        if attempts < max_attempts {
            let delay = Duration::from_secs(2u64.pow(attempts));
            warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_attempts);
            sleep(delay).await;
        }
    }

    Err(MenuError::fetch(format!(
        "failed to fetch {} after {} attempt(s): {}",
        url,
        max_attempts,
        last_error.unwrap_or_else(|| "no attempt made".to_string())
    )))
}
