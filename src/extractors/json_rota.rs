use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;

use super::{expect_kind, ExtractContext, ExtractedMenu, MenuExtractor, SourceFamily};
use crate::config::Config;
use crate::error::{MenuError, Result};
use crate::models::{ContentKind, Price, RawSourcePayload};
use crate::parsers::clean_text;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RotaDocument {
    #[serde(default)]
    weekly_rota_array: Vec<WeeklyRota>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct WeeklyRota {
    #[serde(default)]
    day_of_week_array: Vec<DayOfWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DayOfWeek {
    day_of_week_code: u32,
    #[serde(default)]
    opening_hour_array: Vec<OpeningHour>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OpeningHour {
    #[serde(default)]
    meal_time_array: Vec<MealTimeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MealTimeEntry {
    name: String,
    #[serde(default)]
    line_array: Vec<Line>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Line {
    name: String,
    #[serde(default)]
    meal: Option<Meal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Meal {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    meal_price_array: Vec<MealPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MealPrice {
    price: f64,
    customer_group_desc: String,
}

/// Monday and Sunday of the week containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// Weekly rota API: one document per facility and week, indexed by weekday
/// and meal time. Each serving line becomes one menu line.
pub struct JsonRotaExtractor {
    config: Arc<Config>,
}

impl JsonRotaExtractor {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl MenuExtractor for JsonRotaExtractor {
    fn family(&self) -> SourceFamily {
        SourceFamily::JsonRota
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Json
    }

    fn url_params(&self, today: NaiveDate) -> Vec<(&'static str, String)> {
        let (first, last) = week_bounds(today);
        vec![
            ("valid_after", first.format("%Y-%m-%d").to_string()),
            ("valid_before", last.format("%Y-%m-%d").to_string()),
        ]
    }

    fn extract(&self, payload: RawSourcePayload, ctx: &ExtractContext<'_>) -> Result<ExtractedMenu> {
        expect_kind(&payload, ContentKind::Json)?;
        let settings = &self.config.json_rota;

        let document: RotaDocument = serde_json::from_str(payload.body.trim())
            .map_err(|e| MenuError::structure(format!("malformed rota document: {e}")))?;

        let rota = document
            .weekly_rota_array
            .first()
            .ok_or_else(|| MenuError::structure("rota document has no weekly rota"))?;

        let day_code = ctx.today.weekday().number_from_monday();
        let day = rota
            .day_of_week_array
            .iter()
            .find(|d| d.day_of_week_code == day_code)
            .ok_or_else(|| MenuError::structure(format!("no rota entry for weekday {day_code}")))?;

        let label = settings.label_for(ctx.location.meal_time);
        let meal_time = day
            .opening_hour_array
            .first()
            .and_then(|hours| hours.meal_time_array.iter().find(|m| m.name == label))
            .ok_or_else(|| MenuError::structure(format!("no {label:?} entry on weekday {day_code}")))?;

        let mut menu = ExtractedMenu::default();

        for line in &meal_time.line_array {
            let Some(meal) = &line.meal else {
                menu.push(clean_text(&line.name), Price::ZERO, String::new());
                continue;
            };

            let amount = meal
                .meal_price_array
                .iter()
                .find(|p| p.customer_group_desc == settings.customer_group)
                .map(|p| p.price)
                .ok_or_else(|| {
                    MenuError::structure(format!(
                        "{} on line {:?} has no {:?} price",
                        meal.name, line.name, settings.customer_group
                    ))
                })?;
            let price = Price::from_amount(amount).ok_or_else(|| MenuError::parse("price", amount.to_string()))?;

            let meal_name = clean_text(&meal.name);
            let description = match meal.description.as_deref().map(clean_text) {
                Some(desc) if !desc.is_empty() => format!("{meal_name} | {desc}"),
                _ => meal_name,
            };

            menu.push(clean_text(&line.name), price, description);
        }

        Ok(menu)
    }
}
