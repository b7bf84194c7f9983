#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mensa_menu::config::{Config, LocationConfig};
use mensa_menu::error::{MenuError, Result};
use mensa_menu::extractors::SourceFamily;
use mensa_menu::fetcher::SourceFetcher;
use mensa_menu::utils::browser::{BrowserLauncher, BrowserSession};
use mensa_menu::utils::http::create_client;
use mensa_menu::{Aggregator, Location, MealTime};

/// 2024-03-12, a Tuesday.
pub fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
}

pub fn location(id: Location, family: SourceFamily, url: String) -> LocationConfig {
    LocationConfig {
        id,
        name: id.key().to_string(),
        family,
        meal_time: MealTime::Lunch,
        url,
        enabled: true,
    }
}

pub fn config_with(locations: Vec<LocationConfig>) -> Arc<Config> {
    let mut config = Config::defaults().unwrap();
    config.locations = locations;
    config.browser.wait_timeout_secs = 1;
    Arc::new(config)
}

pub fn aggregator(config: Arc<Config>, launcher: Arc<dyn BrowserLauncher>) -> Aggregator {
    let client = create_client(&config.http).unwrap();
    let fetcher = SourceFetcher::new(config.clone(), client, launcher);
    Aggregator::new(config, fetcher)
}

/// Serves a fixed rendered document and records what the fetcher did.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    pub html: String,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeBrowser {
    pub fn serving(html: &str) -> Self {
        Self {
            html: html.to_string(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

struct FakeSession(FakeBrowser);

#[async_trait]
impl BrowserLauncher for FakeBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        self.calls.lock().unwrap().push("launch".to_string());
        Ok(Box::new(FakeSession(self.clone())))
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.0.calls.lock().unwrap().push(format!("goto {url}"));
        Ok(())
    }

    async fn wait_for(&mut self, _selector: &str, _limit: Duration) -> Result<bool> {
        Ok(!self.0.html.is_empty())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.0.calls.lock().unwrap().push(format!("click {selector}"));
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        if self.0.html.is_empty() {
            return Err(MenuError::fetch("page never rendered"));
        }
        Ok(self.0.html.clone())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.0.calls.lock().unwrap().push("close".to_string());
        Ok(())
    }
}

pub fn uzh_page(headings: &[&str], paragraphs: &[&str]) -> String {
    let mut body = String::from(r#"<html><body><div class="NewsListItem--content">"#);
    body.push_str("<p>Willkommen in der Mensa</p>");
    for heading in headings {
        body.push_str(&format!("<h3>{heading}</h3>"));
    }
    for paragraph in paragraphs {
        body.push_str(&format!("<p>{paragraph}</p>"));
    }
    body.push_str("</div></body></html>");
    body
}
