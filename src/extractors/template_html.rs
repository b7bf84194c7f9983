use scraper::Html;
use std::sync::Arc;
use tracing::debug;

use super::{expect_kind, parse_selector, ExtractContext, ExtractedMenu, MenuExtractor, SourceFamily};
use crate::config::Config;
use crate::error::{MenuError, Result};
use crate::models::{ContentKind, RawSourcePayload};
use crate::parsers::{element_text, parse_price};

/// Static daily pages that share one CMS template: a content container with
/// `Name | CHF x.xx / y.yy` headings followed by description paragraphs.
pub struct TemplateHtmlExtractor {
    config: Arc<Config>,
}

impl TemplateHtmlExtractor {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl MenuExtractor for TemplateHtmlExtractor {
    fn family(&self) -> SourceFamily {
        SourceFamily::TemplateHtml
    }

    fn extract(&self, payload: RawSourcePayload, ctx: &ExtractContext<'_>) -> Result<ExtractedMenu> {
        expect_kind(&payload, ContentKind::Html)?;
        let settings = &self.config.template_html;

        let document = Html::parse_document(&payload.body);
        let container_selector = parse_selector(&settings.container_selector)?;
        let heading_selector = parse_selector(&settings.heading_selector)?;
        let paragraph_selector = parse_selector(&settings.paragraph_selector)?;

        let container = document.select(&container_selector).next().ok_or_else(|| {
            MenuError::structure(format!(
                "no {} container on the {} page",
                settings.container_selector, ctx.location.id
            ))
        })?;

        let mut menu = ExtractedMenu::default();

        for heading in container.select(&heading_selector) {
            let text = element_text(heading);
            let mut parts = text.split(settings.delimiter.as_str());
            let (Some(name), Some(price_segment)) = (parts.next(), parts.next()) else {
                debug!("Skipping heading without price on {}: {:?}", ctx.location.id, text);
                continue;
            };

            menu.names.push(name.trim().to_string());
            menu.prices.push(parse_price(price_segment, &settings.currency_prefix)?);
        }

        // First remaining paragraph is the page preamble
        menu.descriptions = container
            .select(&paragraph_selector)
            .map(element_text)
            .filter(|text| !text.starts_with(&settings.allergen_marker))
            .skip(1)
            .collect();

        Ok(menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Price};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn extract(html: &str) -> Result<ExtractedMenu> {
        let config = Arc::new(Config::defaults().unwrap());
        let location = config.location(Location::UzhOben).unwrap().clone();
        let ctx = ExtractContext {
            location: &location,
            today: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
        };
        TemplateHtmlExtractor::new(config.clone()).extract(RawSourcePayload::html(html), &ctx)
    }

    #[test]
    fn pairs_headings_with_paragraphs_after_preamble() {
        let menu = extract(
            r#"<html><body><div class="NewsListItem--content">
                <p>Unsere Menüs heute</p>
                <h3>Garden | CHF 7.00 / 9.50</h3>
                <p>Linsencurry mit Basmatireis</p>
                <h3>Butcher | CHF 8.70 / 11.00</h3>
                <p>Allergikerinformationen: Gluten, Milch</p>
                <p>Schweinsschnitzel mit Pommes</p>
                <h3>Öffnungszeiten</h3>
            </div></body></html>"#,
        )
        .unwrap();

        assert_eq!(menu.names, vec!["Garden", "Butcher"]);
        assert_eq!(menu.prices, vec![Price::from_cents(700), Price::from_cents(870)]);
        assert_eq!(
            menu.descriptions,
            vec!["Linsencurry mit Basmatireis", "Schweinsschnitzel mit Pommes"]
        );
    }

    #[test]
    fn missing_container_is_a_structure_error() {
        let err = extract("<html><body><h3>Garden | CHF 7.00</h3></body></html>").unwrap_err();
        assert!(err.is_structure());
    }

    #[test]
    fn unparseable_price_is_a_parse_error() {
        let err = extract(
            r#"<div class="NewsListItem--content"><p>x</p><h3>Garden | CHF ?</h3><p>y</p></div>"#,
        )
        .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn page_without_menu_headings_yields_no_names() {
        let menu = extract(
            r#"<div class="NewsListItem--content"><h3>Heute geschlossen</h3><p>Bis morgen</p></div>"#,
        )
        .unwrap();
        assert!(menu.names.is_empty());
        assert!(menu.prices.is_empty());
    }
}
