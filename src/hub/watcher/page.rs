extern crate serde;

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// The document the watcher is attached to.
pub trait Page: Send + Sync {
    fn url(&self) -> String;
    /// Serialized snapshot of the whole document.
    fn document(&self) -> String;
    /// Show the "uploaded" marker pointing at `url`.
    fn mark_uploaded(&self, url: &str);
}

/// The environment hosting the page. Its context may go away at any time,
/// for example while the host reloads.
pub trait Host: Send + Sync {
    fn is_context_valid(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationBatch {
    /// Outer HTML of every added node.
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub removed: usize,
    #[serde(default)]
    pub attributes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum PageEvent {
    Mutations(MutationBatch),
    Navigated { url: String },
    Unloaded,
}

/// A page kept in memory. Used for saved snapshots and replayed sessions.
#[derive(Debug, Default)]
pub struct Snapshot {
    url: Mutex<String>,
    document: Mutex<String>,
    marker: Mutex<Option<String>>,
}
impl Snapshot {
    pub fn new(url: &str, document: &str) -> Self {
        Snapshot {
            url: Mutex::new(url.to_string()),
            document: Mutex::new(document.to_string()),
            marker: Mutex::new(None),
        }
    }
    pub fn set_url(&self, url: &str) {
        if let Ok(mut u) = self.url.lock() {
            *u = url.to_string();
        }
        if let Ok(mut m) = self.marker.lock() {
            *m = None;
        }
    }
    pub fn set_document(&self, document: &str) {
        if let Ok(mut d) = self.document.lock() {
            *d = document.to_string();
        }
    }
    pub fn marker(&self) -> Option<String> {
        self.marker.lock().ok().and_then(|m| m.clone())
    }
}
impl Page for Snapshot {
    fn url(&self) -> String {
        self.url.lock().map(|u| u.clone()).unwrap_or_default()
    }
    fn document(&self) -> String {
        self.document.lock().map(|d| d.clone()).unwrap_or_default()
    }
    fn mark_uploaded(&self, url: &str) {
        if let Ok(mut m) = self.marker.lock() {
            *m = Some(url.to_string());
        }
    }
}

/// A host whose context never goes away.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;
impl Host for Detached {
    fn is_context_valid(&self) -> bool {
        true
    }
}
