use anyhow::Result;
use chrono::{Datelike, Local, Weekday};
use std::sync::Arc;
use tracing::{info, warn};

use mensa_menu::models::MenuLine;
use mensa_menu::parsers::normalize_text;
use mensa_menu::{Aggregator, Config, LocationError};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    info!("Starting Mensa Menu");

    let config = Arc::new(Config::load()?);
    let today = Local::now().date_naive();
    if matches!(today.weekday(), Weekday::Sat | Weekday::Sun) {
        warn!("No mensa is open on weekends, most sources will come back empty");
    }

    let aggregator = Aggregator::from_config(config.clone())?;
    let aggregation = aggregator.collect_for(today).await;

    println!(
        "Today is {} and here is today's menu:\n",
        config.weekday_name(today)
    );

    let meal_time = config.display.meal_time;
    let shown = config
        .enabled_locations()
        .filter(|location| location.meal_time == meal_time);

    for (idx, location) in shown.enumerate() {
        println!("{}: {}", idx, normalize_text(&location.name).to_uppercase());
        println!("{}", "-".repeat(20));

        match aggregation.table.get(location.id) {
            Some(lines) => {
                for line in lines {
                    println!("{}", format_line(line, &config.display.currency));
                }
            }
            None => {
                let reason = aggregation
                    .errors
                    .iter()
                    .find(|e| e.location == location.id)
                    .map(|e: &LocationError| e.error.to_string())
                    .unwrap_or_else(|| "not fetched".to_string());
                println!("Menu unavailable ({})", reason);
            }
        }
        println!();
    }

    if !aggregation.errors.is_empty() {
        warn!("{} location(s) failed", aggregation.errors.len());
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("mensa_menu=info".parse()?);

    if std::env::var("MENSA_LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

fn format_line(line: &MenuLine, currency: &str) -> String {
    if line.description.is_empty() {
        format!("{} ({} {})", line.name, currency, line.price)
    } else {
        format!("{} ({} {}): {}", line.name, currency, line.price, line.description)
    }
}
