use tracing::{debug, info};

use crate::error::{MenuError, Result};
use crate::extractors::ExtractedMenu;
use crate::models::{Location, MenuLine};

/// Zip extracted lists into menu lines for `location`.
///
/// Names and prices must pair up exactly. Descriptions may outnumber names
/// (trailing paragraphs are dropped) but never fall short. An empty menu
/// becomes the single placeholder line.
pub fn align(location: Location, menu: ExtractedMenu) -> Result<Vec<MenuLine>> {
    let ExtractedMenu {
        names,
        prices,
        mut descriptions,
    } = menu;

    if names.len() != prices.len() {
        return Err(MenuError::structure(format!(
            "{} names but {} prices",
            names.len(),
            prices.len()
        )));
    }
    if descriptions.len() < names.len() {
        return Err(MenuError::structure(format!(
            "{} names but only {} descriptions",
            names.len(),
            descriptions.len()
        )));
    }

    if names.is_empty() {
        info!("No dishes found for {}", location);
        return Ok(vec![MenuLine::placeholder(location)]);
    }

    descriptions.truncate(names.len());

    let lines: Vec<MenuLine> = names
        .into_iter()
        .zip(prices)
        .zip(descriptions)
        .map(|((name, price), description)| MenuLine {
            location,
            name,
            price,
            description,
        })
        .collect();

    for line in &lines {
        debug!("{} - {} - {}", line.name, line.price, line.description);
    }

    Ok(lines)
}
