use serde::{Deserialize, Serialize};
use std::fmt;

/// A cafeteria counter. Declaration order is the order menus are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    UzhOben,
    UzhUnten,
    UzhAbend,
    Platte,
    Poly,
    PolyAbend,
    Wok,
}

impl Location {
    pub const ALL: [Location; 7] = [
        Location::UzhOben,
        Location::UzhUnten,
        Location::UzhAbend,
        Location::Platte,
        Location::Poly,
        Location::PolyAbend,
        Location::Wok,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Location::UzhOben => "uzh_oben",
            Location::UzhUnten => "uzh_unten",
            Location::UzhAbend => "uzh_abend",
            Location::Platte => "platte",
            Location::Poly => "poly",
            Location::PolyAbend => "poly_abend",
            Location::Wok => "wok",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "uzh_oben" => Some(Location::UzhOben),
            "uzh_unten" => Some(Location::UzhUnten),
            "uzh_abend" => Some(Location::UzhAbend),
            "platte" => Some(Location::Platte),
            "poly" => Some(Location::Poly),
            "poly_abend" => Some(Location::PolyAbend),
            "wok" => Some(Location::Wok),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Which of the two daily services a location serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealTime {
    Lunch,
    Dinner,
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealTime::Lunch => write!(f, "lunch"),
            MealTime::Dinner => write!(f, "dinner"),
        }
    }
}
