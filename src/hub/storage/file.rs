extern crate async_trait;
extern crate serde_json;
extern crate serde_yaml;
extern crate tokio;

use super::{
    error::{Error, Result},
    memory::MemoryStore,
    Changes, KeyValueStore,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};
use tokio::sync::broadcast;

fn write_yaml(path: &Path, values: &Map<String, Value>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path).map_err(Error::Io)?);
    serde_yaml::to_writer(&mut writer, values).map_err(Error::Yaml)?;
    writer.flush().map_err(Error::Io)?;
    writer.get_ref().sync_all().map_err(Error::Io)
}

/// A [`MemoryStore`] written back to a YAML file after every change.
pub struct YamlStore {
    path: PathBuf,
    inner: MemoryStore,
}
impl YamlStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match File::open(&path) {
            Ok(f) => serde_yaml::from_reader::<_, Option<Map<String, Value>>>(BufReader::new(f))
                .map_err(Error::Yaml)?
                .unwrap_or_default(),
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(Error::Io(e)),
        };
        Ok(YamlStore {
            path,
            inner: MemoryStore::with_values(values),
        })
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Sibling file the new contents are written to before replacing the
    /// store.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
    fn flush(&self) -> Result<()> {
        let staging = self.staging_path();
        if let Err(e) = write_yaml(&staging, &self.inner.snapshot()?) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        fs::rename(&staging, &self.path).map_err(Error::Io)
    }
}

#[async_trait]
impl KeyValueStore for YamlStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.get(key).await
    }
    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        self.inner.apply_set(items)?;
        self.flush()
    }
    async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.inner.apply_remove(keys)?;
        self.flush()
    }
    fn subscribe(&self) -> broadcast::Receiver<Changes> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.yaml");
        {
            let store = YamlStore::open(&path).unwrap();
            let mut items = Map::new();
            items.insert(String::from("hook"), json!("owner/repo"));
            items.insert(String::from("stats"), json!({"branches": {"owner/repo": "main"}}));
            store.set(items).await.unwrap();
            store.remove(&["missing"]).await.unwrap();
        }
        let store = YamlStore::open(&path).unwrap();
        assert_eq!(store.get("hook").await.unwrap(), Some(json!("owner/repo")));
        assert_eq!(
            store.get("stats").await.unwrap(),
            Some(json!({"branches": {"owner/repo": "main"}}))
        );
    }

    #[tokio::test]
    async fn failed_write_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlStore::open(dir.path().join("gone").join("store.yaml")).unwrap();
        let mut items = Map::new();
        items.insert(String::from("token"), json!("secret"));
        assert!(matches!(store.set(items).await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.yaml");
        let store = YamlStore::open(&path).unwrap();
        let mut items = Map::new();
        items.insert(String::from("hook"), json!("owner/repo"));
        store.set(items).await.unwrap();
        assert!(!store.staging_path().exists());

        fs::create_dir(store.staging_path()).unwrap();
        let mut items = Map::new();
        items.insert(String::from("hook"), json!("owner/other"));
        assert!(matches!(store.set(items).await, Err(Error::Io(_))));

        let reopened = YamlStore::open(&path).unwrap();
        assert_eq!(reopened.get("hook").await.unwrap(), Some(json!("owner/repo")));
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlStore::open(dir.path().join("none.yaml")).unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
    }
}
