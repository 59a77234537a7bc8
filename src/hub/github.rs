extern crate async_trait;
extern crate reqwest;
extern crate serde;

use crate::config::github::{ACCEPT, API_URL, FILE_MODE, TIMEOUT, USER_AGENT, WEB_URL};
use async_trait::async_trait;
use log::debug;
use reqwest::{
    header::{self, HeaderValue},
    Client, Method, RequestBuilder,
};
use serde::de::DeserializeOwned;

pub mod error;
mod retry;
pub mod types;

pub use error::{Error, Kind, Operate, Result};
use error::{decode_error, network_error};
use retry::async_retry;
pub use types::{Blob, Reference, TreeEntry};
use types::{
    BlobRequest, CommitRequest, RefResponse, RefUpdate, RepositoryResponse, TreeItem,
    TreeRequest, TreeResponse,
};

/// The git objects API of one hooked repository.
///
/// Each call is one REST round-trip. Nothing here is transactional: callers
/// order the calls so that the ref update comes last.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    async fn default_branch(&self) -> Result<String>;
    async fn reference(&self, branch: &str) -> Result<Reference>;
    async fn create_blob(&self, content: &str, path: &str) -> Result<Blob>;
    async fn create_tree(&self, base: &str, blobs: &[Blob]) -> Result<String>;
    async fn create_commit(&self, message: &str, tree: &str, parent: &str) -> Result<String>;
    async fn update_ref(&self, reference: &str, commit: &str) -> Result<()>;
    /// Recursive listing of the default branch head.
    async fn tree(&self) -> Result<Vec<TreeEntry>>;
}

/// Builds a [`RemoteRepository`] once the hook and credential are known.
pub trait Connector: Send + Sync {
    fn connect(&self, hook: &str, token: &str) -> Result<Box<dyn RemoteRepository>>;
}

/// Browser address of a directory on a branch.
pub fn tree_url(hook: &str, branch: &str, directory: &str) -> String {
    format!("{}/{}/tree/{}/{}", WEB_URL, hook, branch, directory)
}

fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| Error::new(Operate::BuildClient, network_error(e)))
}

pub struct GitHubConnector {
    client: Client,
    api: String,
}
impl GitHubConnector {
    pub fn new() -> Result<Self> {
        Self::with_api(API_URL)
    }
    pub fn with_api(api: &str) -> Result<Self> {
        Ok(GitHubConnector {
            client: build_client()?,
            api: api.trim_end_matches('/').to_string(),
        })
    }
}
impl Connector for GitHubConnector {
    fn connect(&self, hook: &str, token: &str) -> Result<Box<dyn RemoteRepository>> {
        Ok(Box::new(GitHub {
            client: self.client.clone(),
            api: self.api.clone(),
            hook: hook.to_string(),
            token: token.to_string(),
        }))
    }
}

pub struct GitHub {
    client: Client,
    api: String,
    hook: String,
    token: String,
}
impl GitHub {
    pub fn new(hook: &str, token: &str) -> Result<Self> {
        Ok(GitHub {
            client: build_client()?,
            api: API_URL.to_string(),
            hook: hook.to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api, self.hook, path)
    }
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(header::ACCEPT, HeaderValue::from_static(ACCEPT))
            .header(header::AUTHORIZATION, format!("token {}", self.token))
    }
    async fn send<T, F>(&self, operate: Operate, request: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let request = &request;
        async_retry(move || async move {
            let response = request().send().await.map_err(network_error)?;
            let status = response.status();
            if status.is_success() {
                response.json::<T>().await.map_err(decode_error)
            } else {
                Err(Kind::Status(
                    status,
                    response.text().await.unwrap_or_default(),
                ))
            }
        })
        .await
        .map_err(|kind| Error::new(operate, kind))
    }
}

#[async_trait]
impl RemoteRepository for GitHub {
    async fn default_branch(&self) -> Result<String> {
        let url = format!("{}/repos/{}", self.api, self.hook);
        let repo: RepositoryResponse = self
            .send(Operate::DefaultBranch, || self.request(Method::GET, &url))
            .await?;
        Ok(repo.default_branch)
    }
    async fn reference(&self, branch: &str) -> Result<Reference> {
        let url = self.url(&format!("git/refs/heads/{}", branch));
        let r: RefResponse = self
            .send(Operate::Reference, || self.request(Method::GET, &url))
            .await?;
        Ok(Reference {
            reference: r.reference,
            sha: r.object.sha,
        })
    }
    async fn create_blob(&self, content: &str, path: &str) -> Result<Blob> {
        let url = self.url("git/blobs");
        let body = BlobRequest {
            content,
            encoding: "utf-8",
        };
        let r: types::ObjectResponse = self
            .send(Operate::CreateBlob, || {
                self.request(Method::POST, &url).json(&body)
            })
            .await?;
        debug!("Created blob {} for {}", r.sha, path);
        Ok(Blob {
            path: path.to_string(),
            sha: r.sha,
        })
    }
    async fn create_tree(&self, base: &str, blobs: &[Blob]) -> Result<String> {
        let url = self.url("git/trees");
        let body = TreeRequest {
            base_tree: base,
            tree: blobs
                .iter()
                .map(|b| TreeItem {
                    path: &b.path,
                    mode: FILE_MODE,
                    kind: "blob",
                    sha: &b.sha,
                })
                .collect(),
        };
        let r: types::ObjectResponse = self
            .send(Operate::CreateTree, || {
                self.request(Method::POST, &url).json(&body)
            })
            .await?;
        Ok(r.sha)
    }
    async fn create_commit(&self, message: &str, tree: &str, parent: &str) -> Result<String> {
        let url = self.url("git/commits");
        let body = CommitRequest {
            message,
            tree,
            parents: [parent],
        };
        let r: types::ObjectResponse = self
            .send(Operate::CreateCommit, || {
                self.request(Method::POST, &url).json(&body)
            })
            .await?;
        Ok(r.sha)
    }
    async fn update_ref(&self, reference: &str, commit: &str) -> Result<()> {
        let url = self.url(&format!("git/{}", reference));
        let body = RefUpdate {
            sha: commit,
            force: false,
        };
        let _: RefResponse = self
            .send(Operate::UpdateRef, || {
                self.request(Method::PATCH, &url).json(&body)
            })
            .await?;
        Ok(())
    }
    async fn tree(&self) -> Result<Vec<TreeEntry>> {
        let url = self.url("git/trees/HEAD");
        let r: TreeResponse = self
            .send(Operate::GetTree, || {
                self.request(Method::GET, &url).query(&[("recursive", "1")])
            })
            .await?;
        if r.truncated {
            log::warn!("Tree listing of {} was truncated", self.hook);
        }
        Ok(r.tree)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn urls() {
        assert_eq!(
            tree_url("owner/repo", "main", "LeetCode/Two-Sum"),
            "https://github.com/owner/repo/tree/main/LeetCode/Two-Sum"
        );
        let connector = GitHubConnector::with_api("http://localhost:8080/").unwrap();
        assert_eq!(connector.api, "http://localhost:8080");
        let git = GitHub::new("owner/repo", "secret").unwrap();
        assert_eq!(
            git.url("git/blobs"),
            "https://api.github.com/repos/owner/repo/git/blobs"
        );
    }

    #[test]
    fn request_bodies() {
        let body = serde_json::to_value(TreeRequest {
            base_tree: "base",
            tree: vec![TreeItem {
                path: "LeetCode/Two-Sum/Two-Sum.py",
                mode: FILE_MODE,
                kind: "blob",
                sha: "abc",
            }],
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "base_tree": "base",
                "tree": [{
                    "path": "LeetCode/Two-Sum/Two-Sum.py",
                    "mode": "100644",
                    "type": "blob",
                    "sha": "abc"
                }]
            })
        );
        let commit = serde_json::to_value(CommitRequest {
            message: "m",
            tree: "t",
            parents: ["p"],
        })
        .unwrap();
        assert_eq!(
            commit,
            serde_json::json!({"message": "m", "tree": "t", "parents": ["p"]})
        );
    }

    #[test]
    fn tree_listing_decodes() {
        let r: TreeResponse = serde_json::from_value(serde_json::json!({
            "sha": "root",
            "tree": [
                {"path": "LeetCode", "mode": "040000", "type": "tree", "sha": "d"},
                {"path": "LeetCode/a.py", "mode": "100644", "type": "blob", "sha": "b", "size": 3}
            ],
            "truncated": false
        }))
        .unwrap();
        assert_eq!(r.tree.iter().filter(|e| e.is_blob()).count(), 1);
    }
}
