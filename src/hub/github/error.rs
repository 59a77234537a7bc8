extern crate reqwest;

use crate::config::retry::{RATE_LIMIT_DELAY, RETRY_DELAY};
use reqwest::StatusCode;
use std::{error::Error as StdError, fmt, result::Result as StdResult, time::Duration};

/// Remote call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operate {
    BuildClient,
    DefaultBranch,
    Reference,
    CreateBlob,
    CreateTree,
    CreateCommit,
    UpdateRef,
    GetTree,
}
impl fmt::Display for Operate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BuildClient => "building client",
            Self::DefaultBranch => "reading default branch",
            Self::Reference => "reading reference",
            Self::CreateBlob => "creating blob",
            Self::CreateTree => "creating tree",
            Self::CreateCommit => "creating commit",
            Self::UpdateRef => "updating reference",
            Self::GetTree => "listing tree",
        })
    }
}

#[derive(Debug)]
pub enum Kind {
    Network(reqwest::Error),
    Decode(reqwest::Error),
    /// Non-success status with the provider's response body.
    Status(StatusCode, String),
}
impl Kind {
    /// Delay before repeating a request that failed this way, if it should be.
    pub(super) fn backoff(&self) -> Option<Duration> {
        match self {
            Self::Network(e) if e.is_timeout() || e.is_connect() => Some(RETRY_DELAY),
            Self::Status(status, _) if *status == StatusCode::TOO_MANY_REQUESTS => {
                Some(RATE_LIMIT_DELAY)
            }
            Self::Status(status, _) if status.is_server_error() => Some(RETRY_DELAY),
            _ => None,
        }
    }
}
impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(err) => write!(f, "Error sending request: {}", err),
            Self::Decode(err) => write!(f, "Error decoding response: {}", err),
            Self::Status(status, body) => write!(f, "API returned {}: {}", status, body),
        }
    }
}

#[derive(Debug)]
pub struct Error {
    operate: Operate,
    kind: Kind,
}
impl Error {
    pub fn new(operate: Operate, kind: Kind) -> Self {
        Error { operate, kind }
    }
    pub fn operate(&self) -> Operate {
        self.operate
    }
    pub fn kind(&self) -> &Kind {
        &self.kind
    }
    pub fn status(&self) -> Option<StatusCode> {
        match &self.kind {
            Kind::Status(status, _) => Some(*status),
            Kind::Network(e) | Kind::Decode(e) => e.status(),
        }
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error while {}: {}", self.operate, self.kind)
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            Kind::Network(x) | Kind::Decode(x) => Some(x),
            Kind::Status(_, _) => None,
        }
    }
}

pub type Result<T> = StdResult<T, Error>;

pub(super) fn network_error(err: reqwest::Error) -> Kind {
    Kind::Network(err)
}
pub(super) fn decode_error(err: reqwest::Error) -> Kind {
    Kind::Decode(err)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn backoff_policy() {
        assert_eq!(
            Kind::Status(StatusCode::BAD_GATEWAY, String::new()).backoff(),
            Some(RETRY_DELAY)
        );
        assert_eq!(
            Kind::Status(StatusCode::TOO_MANY_REQUESTS, String::new()).backoff(),
            Some(RATE_LIMIT_DELAY)
        );
        assert_eq!(
            Kind::Status(StatusCode::UNPROCESSABLE_ENTITY, String::new()).backoff(),
            None
        );
        assert_eq!(
            Kind::Status(StatusCode::UNAUTHORIZED, String::new()).backoff(),
            None
        );
    }

    #[test]
    fn display_names_step() {
        let err = Error::new(
            Operate::UpdateRef,
            Kind::Status(StatusCode::CONFLICT, String::from(r#"{"message":"conflict"}"#)),
        );
        assert_eq!(
            err.to_string(),
            r#"Error while updating reference: API returned 409 Conflict: {"message":"conflict"}"#
        );
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }
}
