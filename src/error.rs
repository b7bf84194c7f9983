use thiserror::Error;

use crate::models::Location;

/// Failure while producing one location's menu. Never aborts other locations.
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("fetch failed: {message}")]
    Fetch { message: String },

    #[error("unexpected page structure: {message}")]
    Structure { message: String },

    #[error("could not parse {what} from {input:?}")]
    Parse { what: &'static str, input: String },
}

impl MenuError {
    pub fn fetch(message: impl Into<String>) -> Self {
        MenuError::Fetch {
            message: message.into(),
        }
    }

    pub fn structure(message: impl Into<String>) -> Self {
        MenuError::Structure {
            message: message.into(),
        }
    }

    pub fn parse(what: &'static str, input: impl Into<String>) -> Self {
        MenuError::Parse {
            what,
            input: input.into(),
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, MenuError::Fetch { .. })
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, MenuError::Structure { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, MenuError::Parse { .. })
    }
}

impl From<reqwest::Error> for MenuError {
    fn from(e: reqwest::Error) -> Self {
        MenuError::fetch(e.to_string())
    }
}

#[derive(Error, Debug)]
#[error("{location}: {error}")]
pub struct LocationError {
    pub location: Location,
    #[source]
    pub error: MenuError,
}

pub type Result<T> = std::result::Result<T, MenuError>;
