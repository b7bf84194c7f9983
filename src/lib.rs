pub mod aggregator;
pub mod aligner;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod models;
pub mod parsers;
pub mod utils;

pub use aggregator::{Aggregation, Aggregator};
pub use config::Config;
pub use error::{LocationError, MenuError};
pub use models::{Location, MealTime, MenuLine, MenuTable, Price};
