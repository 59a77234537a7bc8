#![allow(dead_code)]

use async_trait::async_trait;
use judgehub::{
    github::{self, Blob, Connector, Kind, Operate, Reference, RemoteRepository, TreeEntry},
    hash::blob_hash,
    storage::{MemoryStore, Retry, Storage},
    upload::UploadCoordinator,
    VERSION,
};
use reqwest::StatusCode;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::Notify;

pub const HOOK: &str = "owner/solutions";
pub const URL: &str = "https://leetcode.com/problems/two-sum/";
pub const SOURCE: &str = "class Solution:\n    def twoSum(self, nums, target):\n        pass\n";

/// Problem page as it looks right after an accepted run.
pub fn document() -> String {
    format!(
        r#"<html><head><title>Two Sum - LeetCode</title>
<meta property="og:url" content="{}">
</head><body>
<div data-track-load="description_content"><div class="description__x"><p>Find two numbers.</p></div></div>
<div class="text-difficulty-medium">Medium</div>
<a class="topic-tag" href="/tag/array/">Array</a>
<div class="monaco-editor" data-mode-id="python"><textarea class="inputarea">{}</textarea></div>
</body></html>"#,
        URL, SOURCE
    )
}

pub const ACCEPTED: &str =
    r#"<div><span data-e2e-locator="submission-result" class="text-success">Accepted</span></div>"#;

#[derive(Default)]
pub struct Remote {
    pub calls: Mutex<Vec<&'static str>>,
    pub tree: Mutex<Vec<TreeEntry>>,
    /// Fail every call of the named operation.
    pub fail_on: Mutex<Option<&'static str>>,
    /// When set, `create_blob` waits for a permit.
    pub gate: Option<Notify>,
}
impl Remote {
    pub fn gated() -> Self {
        Remote {
            gate: Some(Notify::new()),
            ..Default::default()
        }
    }
    pub fn count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == name)
            .count()
    }
    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
    pub fn fail(&self, name: Option<&'static str>) {
        *self.fail_on.lock().unwrap() = name;
    }
    pub fn add_blob(&self, path: &str, content: &str) {
        self.tree.lock().unwrap().push(TreeEntry {
            path: path.to_string(),
            sha: blob_hash(content),
            kind: String::from("blob"),
            mode: String::from("100644"),
        });
    }
    fn record(&self, name: &'static str, operate: Operate) -> github::Result<()> {
        self.calls.lock().unwrap().push(name);
        if *self.fail_on.lock().unwrap() == Some(name) {
            Err(github::Error::new(
                operate,
                Kind::Status(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    String::from(r#"{"message":"Update is not a fast forward"}"#),
                ),
            ))
        } else {
            Ok(())
        }
    }
}

pub struct Handle(Arc<Remote>);

#[async_trait]
impl RemoteRepository for Handle {
    async fn default_branch(&self) -> github::Result<String> {
        self.0.record("default_branch", Operate::DefaultBranch)?;
        Ok(String::from("main"))
    }
    async fn reference(&self, branch: &str) -> github::Result<Reference> {
        self.0.record("reference", Operate::Reference)?;
        Ok(Reference {
            reference: format!("refs/heads/{}", branch),
            sha: String::from("head"),
        })
    }
    async fn create_blob(&self, content: &str, path: &str) -> github::Result<Blob> {
        if let Some(gate) = &self.0.gate {
            gate.notified().await;
        }
        self.0.record("create_blob", Operate::CreateBlob)?;
        Ok(Blob {
            path: path.to_string(),
            sha: blob_hash(content),
        })
    }
    async fn create_tree(&self, _base: &str, _blobs: &[Blob]) -> github::Result<String> {
        self.0.record("create_tree", Operate::CreateTree)?;
        Ok(String::from("tree"))
    }
    async fn create_commit(
        &self,
        _message: &str,
        _tree: &str,
        _parent: &str,
    ) -> github::Result<String> {
        self.0.record("create_commit", Operate::CreateCommit)?;
        Ok(format!("commit{}", self.0.count("create_commit")))
    }
    async fn update_ref(&self, _reference: &str, _commit: &str) -> github::Result<()> {
        self.0.record("update_ref", Operate::UpdateRef)
    }
    async fn tree(&self) -> github::Result<Vec<TreeEntry>> {
        self.0.record("tree", Operate::GetTree)?;
        Ok(self.0.tree.lock().unwrap().clone())
    }
}

pub struct MockConnector(pub Arc<Remote>);
impl Connector for MockConnector {
    fn connect(&self, hook: &str, token: &str) -> github::Result<Box<dyn RemoteRepository>> {
        assert_eq!(hook, HOOK);
        assert_eq!(token, "secret");
        Ok(Box::new(Handle(self.0.clone())))
    }
}

pub fn storage(store: &Arc<MemoryStore>) -> Storage {
    Storage::with_retry(
        store.clone(),
        Retry {
            count: 3,
            delay: Duration::from_millis(1),
        },
    )
}

/// Store with hook and credential configured.
pub async fn configured() -> (Arc<MemoryStore>, Storage) {
    let store = Arc::new(MemoryStore::new());
    let storage = storage(&store);
    storage.save_hook(HOOK).await.unwrap();
    storage.save_token("secret").await.unwrap();
    (store, storage)
}

pub fn coordinator(storage: &Storage, remote: &Arc<Remote>) -> Arc<UploadCoordinator> {
    Arc::new(UploadCoordinator::new(
        storage.clone(),
        Arc::new(MockConnector(remote.clone())),
        VERSION,
    ))
}
