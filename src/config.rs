use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::extractors::SourceFamily;
use crate::models::{Location, MealTime};

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Optional override file, looked up in the working directory.
const CONFIG_FILE: &str = "mensa";
const ENV_PREFIX: &str = "MENSA";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub browser: BrowserConfig,
    pub aggregator: AggregatorConfig,
    pub display: DisplayConfig,
    /// Localized weekday names, Monday first.
    pub weekday_names: Vec<String>,
    pub template_html: TemplateHtmlConfig,
    pub json_rota: JsonRotaConfig,
    pub rendered_table: RenderedTableConfig,
    pub locations: Vec<LocationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub wait_timeout_secs: u64,
    #[serde(default)]
    pub executable: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    pub concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub meal_time: MealTime,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateHtmlConfig {
    pub container_selector: String,
    pub heading_selector: String,
    pub paragraph_selector: String,
    pub delimiter: String,
    pub allergen_marker: String,
    pub currency_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRotaConfig {
    pub lunch_label: String,
    pub dinner_label: String,
    pub customer_group: String,
}

impl JsonRotaConfig {
    pub fn label_for(&self, meal_time: MealTime) -> &str {
        match meal_time {
            MealTime::Lunch => &self.lunch_label,
            MealTime::Dinner => &self.dinner_label,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedTableConfig {
    pub wait_selector: String,
    pub reveal_selector: String,
    pub container_selector: String,
    pub title_selector: String,
    pub description_selector: String,
    pub price_selector: String,
    pub currency_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub id: Location,
    pub name: String,
    pub family: SourceFamily,
    pub meal_time: MealTime,
    /// May contain `{weekday}`, `{date}`, `{valid_after}` and `{valid_before}`.
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Config {
    /// Built-in defaults, then `./mensa.toml`, then `MENSA__*` variables.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to assemble configuration sources")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Only the compiled-in defaults, ignoring files and environment.
    pub fn defaults() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .context("Failed to parse configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.weekday_names.len() != 7 {
            bail!(
                "weekday_names must list 7 days, found {}",
                self.weekday_names.len()
            );
        }

        let mut seen = HashSet::new();
        for location in &self.locations {
            if !seen.insert(location.id) {
                bail!("location {} is configured more than once", location.id);
            }
        }

        if self.http.max_attempts == 0 {
            bail!("http.max_attempts must be at least 1");
        }

        Ok(())
    }

    pub fn location(&self, id: Location) -> Option<&LocationConfig> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn enabled_locations(&self) -> impl Iterator<Item = &LocationConfig> {
        self.locations.iter().filter(|l| l.enabled)
    }

    pub fn weekday_name(&self, date: NaiveDate) -> &str {
        let idx = date.weekday().num_days_from_monday() as usize;
        self.weekday_names.get(idx).map(String::as_str).unwrap_or_default()
    }
}

/// Substitute `{key}` placeholders; unknown placeholders are left untouched.
pub fn render_template(template: &str, params: &[(&str, String)]) -> String {
    params.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}
