extern crate rand;
extern crate reqwest;
extern crate serde;

use crate::{
    config::{
        github::{TIMEOUT, USER_AGENT},
        oauth::{ACCESS_TOKEN_URL, AUTHORIZATION_URL, REDIRECT_URL, SCOPES, STATE_LEN},
    },
    storage::{self, Storage, OAUTH_STATE, PIPE},
};
use log::info;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use reqwest::{header, Client, Url};
use serde::{Deserialize, Serialize};
use std::{error::Error as StdError, fmt};

#[derive(Debug)]
pub enum Error {
    Storage(storage::Error),
    Network(reqwest::Error),
    /// No authorization is waiting for a code.
    NotStarted,
    StateMismatch,
    Denied(String),
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage: {}", e),
            Self::Network(e) => write!(f, "Error requesting access token: {}", e),
            Self::NotStarted => f.write_str("No authorization in progress"),
            Self::StateMismatch => f.write_str("Authorization state doesn't match"),
            Self::Denied(reason) => write!(f, "Authorization denied: {}", reason),
        }
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}
impl From<storage::Error> for Error {
    fn from(e: storage::Error) -> Self {
        Self::Storage(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn random_state() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

/// GitHub OAuth web flow for an application registration.
pub struct OAuth2 {
    client_id: String,
    client_secret: String,
    token_url: String,
}
impl OAuth2 {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        OAuth2 {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: ACCESS_TOKEN_URL.to_string(),
        }
    }
    pub fn with_token_url(mut self, url: &str) -> Self {
        self.token_url = url.to_string();
        self
    }

    /// Mark an authorization as in progress and return the address the user
    /// has to visit.
    pub async fn begin(&self, storage: &Storage) -> Result<String> {
        let state = random_state();
        let scope = SCOPES.join(" ");
        storage.set(PIPE, &true).await?;
        storage.set(OAUTH_STATE, &state).await?;
        let url = Url::parse_with_params(
            AUTHORIZATION_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", REDIRECT_URL),
                ("scope", scope.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| Error::Denied(e.to_string()))?;
        Ok(url.into())
    }

    /// Trade the `code` GitHub redirected with for an access token and store
    /// it.
    pub async fn complete(&self, storage: &Storage, code: &str, state: &str) -> Result<()> {
        if !storage.get::<bool>(PIPE).await?.unwrap_or(false) {
            return Err(Error::NotStarted);
        }
        if storage.get::<String>(OAUTH_STATE).await?.as_deref() != Some(state) {
            return Err(Error::StateMismatch);
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .map_err(Error::Network)?;
        let response: TokenResponse = client
            .post(&self.token_url)
            .header(header::ACCEPT, "application/json")
            .form(&TokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                code,
            })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(Error::Network)?
            .json()
            .await
            .map_err(Error::Network)?;
        storage.remove(&[PIPE, OAUTH_STATE]).await?;
        match response.access_token {
            Some(token) => {
                info!("Received access token");
                storage.save_token(&token).await?;
                Ok(())
            }
            None => Err(Error::Denied(
                response
                    .error_description
                    .unwrap_or_else(|| String::from("no access token returned")),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn begin_stores_pipe_and_state() {
        let storage = Storage::new(Arc::new(MemoryStore::new()));
        let url = OAuth2::new("client", "secret").begin(&storage).await.unwrap();
        let state: String = storage.get(OAUTH_STATE).await.unwrap().unwrap();
        assert_eq!(state.len(), STATE_LEN);
        assert_eq!(storage.get::<bool>(PIPE).await.unwrap(), Some(true));

        let url = Url::parse(&url).unwrap();
        assert_eq!(url.path(), "/login/oauth/authorize");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&(String::from("client_id"), String::from("client"))));
        assert!(query.contains(&(String::from("scope"), String::from("repo"))));
        assert!(query.contains(&(String::from("state"), state)));
    }

    #[tokio::test]
    async fn complete_checks_state_first() {
        let storage = Storage::new(Arc::new(MemoryStore::new()));
        let oauth = OAuth2::new("client", "secret").with_token_url("http://127.0.0.1:9/");
        assert!(matches!(
            oauth.complete(&storage, "code", "state").await,
            Err(Error::NotStarted)
        ));
        oauth.begin(&storage).await.unwrap();
        assert!(matches!(
            oauth.complete(&storage, "code", "forged").await,
            Err(Error::StateMismatch)
        ));
        assert_eq!(storage.token().await.unwrap(), None);
    }
}
