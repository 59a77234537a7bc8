extern crate serde;
extern crate serde_json;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One entry of the solved-problem ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Everything kept under the `stats` key.
///
/// `submission` mirrors the remote path segments: the hash of
/// `owner/repo/LeetCode/Two-Sum/Two-Sum.py` lives at
/// `submission["owner"]["repo"]["LeetCode"]["Two-Sum"]["Two-Sum.py"]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub branches: HashMap<String, String>,
    #[serde(default)]
    pub submission: Map<String, Value>,
    #[serde(default)]
    pub problems: HashMap<String, Problem>,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|p| !p.is_empty()).collect()
}

/// Remove `parts` below `map`, dropping directories left empty.
fn remove_in(map: &mut Map<String, Value>, parts: &[&str]) -> bool {
    match parts {
        [] => false,
        [last] => map.remove(*last).is_some(),
        [dir, rest @ ..] => {
            let (removed, empty) = match map.get_mut(*dir) {
                Some(Value::Object(child)) => (remove_in(child, rest), child.is_empty()),
                _ => return false,
            };
            if empty {
                map.remove(*dir);
            }
            removed
        }
    }
}

impl Stats {
    /// Hash recorded for `path`, if any.
    pub fn hash_at(&self, path: &str) -> Option<&str> {
        let parts = segments(path);
        let (last, dirs) = parts.split_last()?;
        let mut current = &self.submission;
        for dir in dirs {
            current = current.get(*dir)?.as_object()?;
        }
        current.get(*last)?.as_str()
    }

    /// Record `hash` for `path`, creating (or replacing non-directory)
    /// intermediate entries as needed.
    pub fn set_hash(&mut self, path: &str, hash: &str) {
        let parts = segments(path);
        let (last, dirs) = match parts.split_last() {
            Some(v) => v,
            None => return,
        };
        let mut current = &mut self.submission;
        for dir in dirs {
            let entry = current
                .entry(dir.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => unreachable!(),
            };
        }
        current.insert(last.to_string(), Value::String(hash.to_string()));
    }

    /// Forget the hash or directory at `path`. Returns whether anything was
    /// recorded there.
    pub fn remove_at(&mut self, path: &str) -> bool {
        remove_in(&mut self.submission, &segments(path))
    }

    pub fn branch(&self, hook: &str) -> Option<&str> {
        self.branches.get(hook).map(String::as_str)
    }

    /// Whether the cached metadata must be rebuilt from the remote tree.
    pub fn needs_resync(&self, hook: &str, version: &str) -> bool {
        self.version.as_deref() != Some(version) || self.branch(hook).is_none()
    }

    /// Fill in missing parts and drop caches written by another version.
    /// The old marker is kept so the next upload still resyncs.
    pub fn normalize(&mut self, version: &str) {
        if self.version.is_none() {
            self.version = Some(String::from("0.0.0"));
        }
        if self.version.as_deref() != Some(version) {
            self.branches.clear();
            self.submission.clear();
            self.problems.clear();
        }
    }
}
