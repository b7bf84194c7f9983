use chrono::NaiveDate;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{Config, LocationConfig};
use crate::error::{MenuError, Result};
use crate::models::{ContentKind, Price, RawSourcePayload};
use crate::parsers::{normalize_description, normalize_name};

mod json_rota;
mod rendered_table;
mod template_html;

pub use json_rota::{week_bounds, JsonRotaExtractor};
pub use rendered_table::RenderedTableExtractor;
pub use template_html::TemplateHtmlExtractor;

/// How a location's source has to be read. Chosen per location in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFamily {
    TemplateHtml,
    JsonRota,
    RenderedTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Http,
    Browser,
}

impl SourceFamily {
    pub fn fetch_mode(&self) -> FetchMode {
        match self {
            SourceFamily::TemplateHtml | SourceFamily::JsonRota => FetchMode::Http,
            SourceFamily::RenderedTable => FetchMode::Browser,
        }
    }

    pub fn extractor(&self, config: Arc<Config>) -> Box<dyn MenuExtractor> {
        match self {
            SourceFamily::TemplateHtml => Box::new(TemplateHtmlExtractor::new(config)),
            SourceFamily::JsonRota => Box::new(JsonRotaExtractor::new(config)),
            SourceFamily::RenderedTable => Box::new(RenderedTableExtractor::new(config)),
        }
    }
}

pub struct ExtractContext<'a> {
    pub location: &'a LocationConfig,
    pub today: NaiveDate,
}

/// Parallel name/price/description lists in source order, not yet aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMenu {
    pub names: Vec<String>,
    pub prices: Vec<Price>,
    pub descriptions: Vec<String>,
}

impl ExtractedMenu {
    pub fn push(&mut self, name: String, price: Price, description: String) {
        self.names.push(name);
        self.prices.push(price);
        self.descriptions.push(description);
    }

    pub fn normalized(self) -> Self {
        Self {
            names: self.names.iter().map(|n| normalize_name(n)).collect(),
            prices: self.prices,
            descriptions: self
                .descriptions
                .iter()
                .map(|d| normalize_description(d))
                .collect(),
        }
    }
}

pub trait MenuExtractor: Send + Sync {
    fn family(&self) -> SourceFamily;

    fn content_kind(&self) -> ContentKind {
        ContentKind::Html
    }

    /// Extra URL template parameters this family needs for `today`.
    fn url_params(&self, _today: NaiveDate) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn extract(&self, payload: RawSourcePayload, ctx: &ExtractContext<'_>) -> Result<ExtractedMenu>;
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| MenuError::structure(format!("invalid selector {selector:?}")))
}

pub(crate) fn expect_kind(payload: &RawSourcePayload, kind: ContentKind) -> Result<()> {
    if payload.kind == kind {
        Ok(())
    } else {
        Err(MenuError::structure(format!(
            "expected {:?} payload, got {:?}",
            kind, payload.kind
        )))
    }
}
