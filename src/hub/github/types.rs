extern crate serde;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Full ref name, e.g. `refs/heads/main`.
    pub reference: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub path: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub mode: String,
}
impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

#[derive(Deserialize)]
pub(super) struct RepositoryResponse {
    pub default_branch: String,
}
#[derive(Deserialize)]
pub(super) struct ObjectResponse {
    pub sha: String,
}
#[derive(Deserialize)]
pub(super) struct RefResponse {
    #[serde(rename = "ref")]
    pub reference: String,
    pub object: ObjectResponse,
}
#[derive(Deserialize)]
pub(super) struct TreeResponse {
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Serialize)]
pub(super) struct BlobRequest<'a> {
    pub content: &'a str,
    pub encoding: &'static str,
}
#[derive(Serialize)]
pub(super) struct TreeItem<'a> {
    pub path: &'a str,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub sha: &'a str,
}
#[derive(Serialize)]
pub(super) struct TreeRequest<'a> {
    pub base_tree: &'a str,
    pub tree: Vec<TreeItem<'a>>,
}
#[derive(Serialize)]
pub(super) struct CommitRequest<'a> {
    pub message: &'a str,
    pub tree: &'a str,
    pub parents: [&'a str; 1],
}
#[derive(Serialize)]
pub(super) struct RefUpdate<'a> {
    pub sha: &'a str,
    pub force: bool,
}
