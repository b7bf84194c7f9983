use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Location;

pub const PLACEHOLDER_NAME: &str = "No dishes available";

// Stored in cents so two-decimal display is exact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: u64) -> Self {
        Price(cents)
    }

    /// Returns `None` for negative or non-finite amounts.
    pub fn from_amount(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        Some(Price((amount * 100.0).round() as u64))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Html,
    Json,
}

/// Raw body of one source response. Moved into the extractor that reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSourcePayload {
    pub kind: ContentKind,
    pub body: String,
}

impl RawSourcePayload {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Html,
            body: body.into(),
        }
    }

    pub fn json(body: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Json,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLine {
    pub location: Location,
    pub name: String,
    pub price: Price,
    pub description: String,
}

impl MenuLine {
    pub fn placeholder(location: Location) -> Self {
        Self {
            location,
            name: PLACEHOLDER_NAME.to_string(),
            price: Price::ZERO,
            description: String::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME && self.price == Price::ZERO && self.description.is_empty()
    }
}

/// Menu lines grouped by location, always iterated in location order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuTable {
    sections: BTreeMap<Location, Vec<MenuLine>>,
}

impl MenuTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was stored for `location`.
    pub fn insert(&mut self, location: Location, lines: Vec<MenuLine>) {
        self.sections.insert(location, lines);
    }

    pub fn get(&self, location: Location) -> Option<&[MenuLine]> {
        self.sections.get(&location).map(Vec::as_slice)
    }

    pub fn sections(&self) -> impl Iterator<Item = (Location, &[MenuLine])> {
        self.sections
            .iter()
            .map(|(location, lines)| (*location, lines.as_slice()))
    }

    pub fn lines(&self) -> impl Iterator<Item = &MenuLine> {
        self.sections.values().flatten()
    }

    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.sections.keys().copied()
    }

    /// Total number of lines across all locations.
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
