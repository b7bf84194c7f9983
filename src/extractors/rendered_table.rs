use scraper::{ElementRef, Html};
use std::sync::Arc;

use super::{expect_kind, parse_selector, ExtractContext, ExtractedMenu, MenuExtractor, SourceFamily};
use crate::config::Config;
use crate::error::{MenuError, Result};
use crate::models::{ContentKind, RawSourcePayload};
use crate::parsers::{element_text, parse_price};

/// Surcharge annotations such as `+1.00` follow the real price.
const SURCHARGE_PREFIX: char = '+';

/// JavaScript-rendered offer pages, read after the browser revealed the week.
/// Every direct child of the day container is one offering.
pub struct RenderedTableExtractor {
    config: Arc<Config>,
}

impl RenderedTableExtractor {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl MenuExtractor for RenderedTableExtractor {
    fn family(&self) -> SourceFamily {
        SourceFamily::RenderedTable
    }

    fn extract(&self, payload: RawSourcePayload, ctx: &ExtractContext<'_>) -> Result<ExtractedMenu> {
        expect_kind(&payload, ContentKind::Html)?;
        let settings = &self.config.rendered_table;

        let document = Html::parse_document(&payload.body);
        let container_selector = parse_selector(&settings.container_selector)?;
        let title_selector = parse_selector(&settings.title_selector)?;
        let description_selector = parse_selector(&settings.description_selector)?;
        let price_selector = parse_selector(&settings.price_selector)?;

        let container = document.select(&container_selector).next().ok_or_else(|| {
            MenuError::structure(format!(
                "no {} container on the {} page",
                settings.container_selector, ctx.location.id
            ))
        })?;

        let mut menu = ExtractedMenu::default();

        for (idx, block) in container.children().filter_map(ElementRef::wrap).enumerate() {
            let title = block
                .select(&title_selector)
                .next()
                .map(element_text)
                .ok_or_else(|| MenuError::structure(format!("offering {idx} has no title")))?;

            let description = block
                .select(&description_selector)
                .next()
                .map(element_text)
                .unwrap_or_default();

            let mut candidates: Vec<String> = block
                .select(&price_selector)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect();
            while candidates.last().is_some_and(|c| c.starts_with(SURCHARGE_PREFIX)) {
                candidates.pop();
            }
            let price_text = candidates
                .last()
                .ok_or_else(|| MenuError::structure(format!("offering {title:?} has no price")))?;

            menu.push(title, parse_price(price_text, &settings.currency_prefix)?, description);
        }

        Ok(menu)
    }
}
