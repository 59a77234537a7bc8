extern crate async_trait;
extern crate serde_json;
extern crate tokio;

use super::{
    error::{Error, Result},
    Change, Changes, KeyValueStore,
};
use crate::config::storage::{CHANGE_CAPACITY, LOCAL_AREA};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Mutex,
    },
};
use tokio::sync::broadcast;

/// Process-local store. Also the building block of [`super::YamlStore`].
pub struct MemoryStore {
    values: Mutex<Map<String, Value>>,
    invalid: AtomicU32,
    changes: broadcast::Sender<Changes>,
    area: String,
}
impl MemoryStore {
    pub fn new() -> Self {
        Self::with_values(Map::new())
    }
    pub fn with_values(values: Map<String, Value>) -> Self {
        MemoryStore {
            values: Mutex::new(values),
            invalid: AtomicU32::new(0),
            changes: broadcast::channel(CHANGE_CAPACITY).0,
            area: LOCAL_AREA.to_string(),
        }
    }
    /// Fail the next `calls` operations with [`Error::ContextInvalidated`].
    pub fn invalidate(&self, calls: u32) {
        self.invalid.store(calls, Ordering::SeqCst);
    }
    pub fn snapshot(&self) -> Result<Map<String, Value>> {
        Ok(self.lock()?.clone())
    }

    fn check(&self) -> Result<()> {
        let busted = self
            .invalid
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match busted {
            Ok(_) => Err(Error::ContextInvalidated),
            Err(_) => Ok(()),
        }
    }
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Map<String, Value>>> {
        self.values
            .lock()
            .map_err(|_| Error::Unavailable(String::from("store lock poisoned")))
    }
    fn notify(&self, items: HashMap<String, Change>) {
        if !items.is_empty() {
            // No receiver is not an error.
            let _ = self.changes.send(Changes {
                area: self.area.clone(),
                items,
            });
        }
    }

    pub(super) fn apply_set(&self, items: Map<String, Value>) -> Result<()> {
        self.check()?;
        let mut changed = HashMap::new();
        {
            let mut values = self.lock()?;
            for (key, value) in items {
                let old_value = values.insert(key.clone(), value.clone());
                if old_value.as_ref() != Some(&value) {
                    changed.insert(
                        key,
                        Change {
                            old_value,
                            new_value: Some(value),
                        },
                    );
                }
            }
        }
        self.notify(changed);
        Ok(())
    }
    pub(super) fn apply_remove(&self, keys: &[&str]) -> Result<()> {
        self.check()?;
        let mut changed = HashMap::new();
        {
            let mut values = self.lock()?;
            for key in keys {
                if let Some(old) = values.remove(*key) {
                    changed.insert(
                        key.to_string(),
                        Change {
                            old_value: Some(old),
                            new_value: None,
                        },
                    );
                }
            }
        }
        self.notify(changed);
        Ok(())
    }
}
impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.check()?;
        Ok(self.lock()?.get(key).cloned())
    }
    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        self.apply_set(items)
    }
    async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.apply_remove(keys)
    }
    fn subscribe(&self) -> broadcast::Receiver<Changes> {
        self.changes.subscribe()
    }
}
