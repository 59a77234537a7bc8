extern crate async_trait;
extern crate serde;
extern crate serde_json;
extern crate tokio;

use crate::stats::Stats;
use async_trait::async_trait;
use log::{debug, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::HashMap, fmt, sync::Arc};
use tokio::sync::broadcast;

pub mod error;
pub mod file;
pub mod memory;
mod retry;

pub use error::{Error, Result};
pub use file::YamlStore;
pub use memory::MemoryStore;
pub use retry::Retry;
use retry::context_retry;

pub const TOKEN: &str = "token";
pub const HOOK: &str = "hook";
pub const USERNAME: &str = "username";
pub const ENABLED: &str = "enabled";
pub const ORG_OPTION: &str = "org_option";
pub const STATS: &str = "stats";
pub const PIPE: &str = "pipe";
pub const OAUTH_STATE: &str = "oauth_state";
pub const IS_SYNC: &str = "is_sync";
/// Onboarding stage of the settings front end; stored but not interpreted.
pub const MODE_TYPE: &str = "mode_type";

const SYNCED_KEYS: [&str; 6] = [TOKEN, USERNAME, PIPE, STATS, HOOK, MODE_TYPE];

#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}
/// One change notification: every key touched by a single write.
#[derive(Debug, Clone)]
pub struct Changes {
    pub area: String,
    pub items: HashMap<String, Change>,
}

/// The host's key/value area. Any call may fail with
/// [`Error::ContextInvalidated`] while the host is reloading.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, items: Map<String, Value>) -> Result<()>;
    async fn remove(&self, keys: &[&str]) -> Result<()>;
    fn subscribe(&self) -> broadcast::Receiver<Changes>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrgOption {
    Platform,
    Language,
}
impl Default for OrgOption {
    fn default() -> Self {
        Self::Platform
    }
}
impl fmt::Display for OrgOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Platform => "platform",
            Self::Language => "language",
        })
    }
}

/// Typed access to the configuration and caches kept in a [`KeyValueStore`].
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
    retry: Retry,
}
impl Storage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_retry(store, Retry::default())
    }
    pub fn with_retry(store: Arc<dyn KeyValueStore>, retry: Retry) -> Self {
        Storage { store, retry }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>> {
        match context_retry(self.retry, key, move || self.store.get(key)).await? {
            None | Some(Value::Null) => Ok(None),
            Some(v) => serde_json::from_value(v)
                .map(Some)
                .map_err(|e| Error::Value(key, e)),
        }
    }
    pub async fn set<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<()> {
        let mut items = Map::new();
        items.insert(
            key.to_string(),
            serde_json::to_value(value).map_err(|e| Error::Value(key, e))?,
        );
        context_retry(self.retry, key, move || self.store.set(items.clone())).await
    }
    pub async fn remove(&self, keys: &[&str]) -> Result<()> {
        context_retry(self.retry, "remove", move || self.store.remove(keys)).await
    }
    pub fn subscribe(&self) -> broadcast::Receiver<Changes> {
        self.store.subscribe()
    }

    pub async fn token(&self) -> Result<Option<String>> {
        self.get(TOKEN).await
    }
    pub async fn save_token(&self, token: &str) -> Result<()> {
        self.set(TOKEN, token).await
    }
    pub async fn hook(&self) -> Result<Option<String>> {
        self.get(HOOK).await
    }
    pub async fn save_hook(&self, hook: &str) -> Result<()> {
        self.set(HOOK, hook).await
    }
    /// Forget the credential; the hooked repository stays configured.
    pub async fn deauthorize(&self) -> Result<()> {
        info!("Removing stored credential");
        self.remove(&[TOKEN, USERNAME]).await
    }
    pub async fn unhook(&self) -> Result<()> {
        self.remove(&[HOOK]).await
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        Ok(self.get(ENABLED).await?.unwrap_or(false))
    }
    pub async fn save_enabled(&self, enabled: bool) -> Result<()> {
        self.set(ENABLED, &enabled).await
    }

    pub async fn org_option(&self) -> Result<OrgOption> {
        match self.get(ORG_OPTION).await? {
            Some(v) => Ok(v),
            None => {
                info!("No organization option stored, defaulting to platform");
                self.save_org_option(OrgOption::default()).await?;
                Ok(OrgOption::default())
            }
        }
    }
    pub async fn save_org_option(&self, option: OrgOption) -> Result<()> {
        self.set(ORG_OPTION, &option).await
    }

    pub async fn stats(&self) -> Result<Stats> {
        Ok(self.get(STATS).await?.unwrap_or_default())
    }
    pub async fn save_stats(&self, stats: &Stats) -> Result<()> {
        self.set(STATS, stats).await
    }
    /// Bring stored stats into the shape the running `version` expects.
    pub async fn init_stats(&self, version: &str) -> Result<Stats> {
        let mut stats = self.stats().await?;
        stats.normalize(version);
        self.save_stats(&stats).await?;
        Ok(stats)
    }

    /// Copy the known keys from another area once. Returns whether a copy
    /// happened.
    pub async fn sync_from(&self, other: &dyn KeyValueStore) -> Result<bool> {
        if self.get::<bool>(IS_SYNC).await?.unwrap_or(false) {
            return Ok(false);
        }
        let mut items = Map::new();
        for key in SYNCED_KEYS.iter() {
            if let Some(v) = context_retry(self.retry, key, move || other.get(key)).await? {
                items.insert(key.to_string(), v);
            }
        }
        debug!("Copying {} keys from the sync area", items.len());
        items.insert(IS_SYNC.to_string(), Value::Bool(true));
        context_retry(self.retry, IS_SYNC, move || self.store.set(items.clone())).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn storage(store: &Arc<MemoryStore>) -> Storage {
        Storage::with_retry(
            store.clone(),
            Retry {
                count: 3,
                delay: Duration::from_millis(10),
            },
        )
    }

    #[tokio::test]
    async fn defaults() {
        let store = Arc::new(MemoryStore::new());
        let storage = storage(&store);
        assert_eq!(storage.token().await.unwrap(), None);
        assert!(!storage.is_enabled().await.unwrap());
        assert_eq!(storage.org_option().await.unwrap(), OrgOption::Platform);
        assert_eq!(
            store.get(ORG_OPTION).await.unwrap(),
            Some(json!("platform"))
        );
        assert_eq!(storage.stats().await.unwrap(), Stats::default());
    }

    #[tokio::test]
    async fn deauthorize_keeps_hook() {
        let store = Arc::new(MemoryStore::new());
        let storage = storage(&store);
        storage.save_token("secret").await.unwrap();
        storage.save_hook("owner/repo").await.unwrap();
        storage.deauthorize().await.unwrap();
        assert_eq!(storage.token().await.unwrap(), None);
        assert_eq!(storage.hook().await.unwrap().as_deref(), Some("owner/repo"));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_failures() {
        let store = Arc::new(MemoryStore::new());
        let storage = storage(&store);
        storage.save_enabled(true).await.unwrap();
        store.invalidate(2);
        assert!(storage.is_enabled().await.unwrap());

        store.invalidate(3);
        assert!(matches!(
            storage.is_enabled().await,
            Err(Error::ContextInvalidated)
        ));
    }

    #[tokio::test]
    async fn malformed_value() {
        let store = Arc::new(MemoryStore::new());
        let mut items = Map::new();
        items.insert(ENABLED.to_string(), json!("yes"));
        store.set(items).await.unwrap();
        assert!(matches!(
            storage(&store).is_enabled().await,
            Err(Error::Value(ENABLED, _))
        ));
    }

    #[tokio::test]
    async fn sync_copies_once() {
        let local = Arc::new(MemoryStore::new());
        let sync = MemoryStore::new();
        let mut items = Map::new();
        items.insert(TOKEN.to_string(), json!("secret"));
        items.insert(HOOK.to_string(), json!("owner/repo"));
        items.insert(MODE_TYPE.to_string(), json!("commit"));
        items.insert(ENABLED.to_string(), json!(true));
        sync.set(items).await.unwrap();

        let storage = storage(&local);
        assert!(storage.sync_from(&sync).await.unwrap());
        assert_eq!(storage.token().await.unwrap().as_deref(), Some("secret"));
        assert_eq!(storage.hook().await.unwrap().as_deref(), Some("owner/repo"));
        assert_eq!(
            storage.get::<String>(MODE_TYPE).await.unwrap().as_deref(),
            Some("commit")
        );
        assert!(!storage.is_enabled().await.unwrap());

        storage.save_token("newer").await.unwrap();
        assert!(!storage.sync_from(&sync).await.unwrap());
        assert_eq!(storage.token().await.unwrap().as_deref(), Some("newer"));
    }

    #[tokio::test]
    async fn init_stats_fills_version() {
        let store = Arc::new(MemoryStore::new());
        let storage = storage(&store);
        let stats = storage.init_stats("1.0.0").await.unwrap();
        assert_eq!(stats.version.as_deref(), Some("0.0.0"));
        assert_eq!(storage.stats().await.unwrap(), stats);
    }
}
