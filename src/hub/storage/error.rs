extern crate serde_json;
extern crate serde_yaml;

use std::{error::Error as StdError, fmt, io, result::Result as StdResult};

#[derive(Debug)]
pub enum Error {
    /// The host binding went away for a moment; the call may succeed later.
    ContextInvalidated,
    Unavailable(String),
    Io(io::Error),
    Yaml(serde_yaml::Error),
    Value(&'static str, serde_json::Error),
}
impl Error {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ContextInvalidated)
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextInvalidated => f.write_str("storage context invalidated"),
            Self::Unavailable(what) => write!(f, "storage unavailable: {}", what),
            Self::Io(err) => write!(f, "Error access store file: {}", err),
            Self::Yaml(err) => write!(f, "Error process store file: {}", err),
            Self::Value(key, err) => write!(f, "Malformed value for {}: {}", key, err),
        }
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::ContextInvalidated | Self::Unavailable(_) => None,
            Self::Io(err) => Some(err),
            Self::Yaml(err) => Some(err),
            Self::Value(_, err) => Some(err),
        }
    }
}

pub type Result<T> = StdResult<T, Error>;
