extern crate handlebars;

use crate::{github, storage};
use handlebars::RenderError;
use std::{error::Error as StdError, fmt, result::Result as StdResult};

#[derive(Debug)]
pub enum Error {
    /// Hook or credential missing; the user has to re-authorize.
    MissingConfig(&'static str),
    Storage(storage::Error),
    Remote(github::Error),
    Readme(RenderError),
}
impl Error {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingConfig(_))
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingConfig(what) => write!(f, "No {} configured", what),
            Self::Storage(err) => write!(f, "Storage: {}", err),
            Self::Remote(err) => write!(f, "Remote: {}", err),
            Self::Readme(err) => write!(f, "Error rendering README: {}", err),
        }
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::MissingConfig(_) => None,
            Self::Storage(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::Readme(err) => Some(err),
        }
    }
}
impl From<storage::Error> for Error {
    fn from(err: storage::Error) -> Self {
        Self::Storage(err)
    }
}
impl From<github::Error> for Error {
    fn from(err: github::Error) -> Self {
        Self::Remote(err)
    }
}
impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::Readme(err)
    }
}

pub type Result<T> = StdResult<T, Error>;
