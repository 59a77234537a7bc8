extern crate chrono;
extern crate futures;

use super::{
    error::{Error, Result},
    readme::Readme,
    slot::{SlotGuard, SlotState, UploadSlot},
};
use crate::{
    github::{tree_url, Blob, Connector, RemoteRepository},
    hash::blob_hash,
    judge::Site,
    stats::{Problem, Stats},
    storage::{OrgOption, Storage},
    submission::{Layout, SubmissionRecord},
};
use chrono::Utc;
use log::{debug, error, info};
use std::{
    fmt,
    sync::{Arc, Mutex},
};

/// Where the current submission is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Detected,
    Extracting,
    /// Configuration lookup and, when needed, the remote tree walk.
    Syncing,
    Hashing,
    Committing,
    Done,
    Failed,
}
impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Detected => "detection",
            Self::Extracting => "extraction",
            Self::Syncing => "cache sync",
            Self::Hashing => "hashing",
            Self::Committing => "commit",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing worth uploading was extracted.
    Skipped,
    /// The repository already holds this exact source.
    Unchanged { url: String },
    Uploaded { url: String, commit: String },
    Failed,
}
impl Outcome {
    /// Browser address to show next to the submission, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Unchanged { url } | Self::Uploaded { url, .. } => Some(url),
            Self::Skipped | Self::Failed => None,
        }
    }
}

/// Turns an accepted [`SubmissionRecord`] into at most one commit on the
/// hooked repository, keeping the hash cache in step with the remote.
pub struct UploadCoordinator {
    storage: Storage,
    connector: Arc<dyn Connector>,
    version: String,
    slot: UploadSlot,
    state: Mutex<UploadState>,
    failed_at: Mutex<Option<UploadState>>,
    readme: Readme,
}
impl UploadCoordinator {
    pub fn new(storage: Storage, connector: Arc<dyn Connector>, version: &str) -> Self {
        UploadCoordinator {
            storage,
            connector,
            version: version.to_string(),
            slot: UploadSlot::new(),
            state: Mutex::new(UploadState::Idle),
            failed_at: Mutex::new(None),
            readme: Readme::new(),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }
    pub fn slot_state(&self) -> SlotState {
        self.slot.state()
    }
    /// Claim the single upload slot. `None` while another upload runs.
    pub fn try_begin(&self) -> Option<SlotGuard> {
        self.slot.try_acquire()
    }
    pub fn state(&self) -> UploadState {
        self.state.lock().map(|s| *s).unwrap_or(UploadState::Failed)
    }
    /// Step the last attempt failed in, if it failed.
    pub fn failed_step(&self) -> Option<UploadState> {
        self.failed_at.lock().ok().and_then(|s| *s)
    }
    fn record_failure(&self, step: Option<UploadState>) {
        if let Ok(mut failed) = self.failed_at.lock() {
            *failed = step;
        }
    }
    pub(crate) fn set_state(&self, state: UploadState) {
        if let Ok(mut current) = self.state.lock() {
            debug!("Upload state {} -> {}", current, state);
            *current = state;
        }
    }

    /// Run the whole pipeline for `record`. Failures are logged and reported
    /// as [`Outcome::Failed`]; the hash cache is only touched after the
    /// remote confirmed the new reference.
    pub async fn process_submission(&self, record: &SubmissionRecord) -> Outcome {
        if !record.is_not_empty() {
            debug!("Extracted record has no title or source, skipping");
            self.set_state(UploadState::Idle);
            return Outcome::Skipped;
        }
        match self.upload(record).await {
            Ok(outcome) => {
                self.record_failure(None);
                self.set_state(UploadState::Done);
                outcome
            }
            Err(e) => {
                let step = self.state();
                self.record_failure(Some(step));
                self.set_state(UploadState::Failed);
                if e.is_configuration() {
                    error!("Upload of {} skipped: {}", record.title, e);
                } else {
                    error!("Upload of {} failed during {}: {}", record.title, step, e);
                }
                Outcome::Failed
            }
        }
    }

    /// Rebuild the hash cache from the hooked repository right away.
    pub async fn resync(&self) -> Result<Stats> {
        let (hook, token) = self.configuration().await?;
        let remote = self.connector.connect(&hook, &token)?;
        let stats = self.storage.stats().await?;
        self.resync_with(&*remote, &hook, stats).await
    }

    async fn configuration(&self) -> Result<(String, String)> {
        let hook = self
            .storage
            .hook()
            .await?
            .ok_or(Error::MissingConfig("hooked repository"))?;
        let token = self
            .storage
            .token()
            .await?
            .ok_or(Error::MissingConfig("access token"))?;
        Ok((hook, token))
    }

    async fn resync_with(
        &self,
        remote: &dyn RemoteRepository,
        hook: &str,
        mut stats: Stats,
    ) -> Result<Stats> {
        info!("Rebuilding hash cache of {} from remote tree", hook);
        let (tree, branch) = futures::try_join!(remote.tree(), remote.default_branch())?;
        stats.remove_at(hook);
        let mut count = 0;
        for entry in tree.iter().filter(|e| e.is_blob()) {
            stats.set_hash(&format!("{}/{}", hook, entry.path), &entry.sha);
            count += 1;
        }
        debug!("Recorded {} hashes, default branch {}", count, branch);
        stats.branches.insert(hook.to_string(), branch);
        stats.version = Some(self.version.clone());
        self.storage.save_stats(&stats).await?;
        Ok(stats)
    }

    async fn upload(&self, record: &SubmissionRecord) -> Result<Outcome> {
        self.set_state(UploadState::Syncing);
        let (hook, token) = self.configuration().await?;
        let remote = self.connector.connect(&hook, &token)?;
        let mut stats = self.storage.stats().await?;
        if stats.needs_resync(&hook, &self.version) {
            stats = self.resync_with(&*remote, &hook, stats).await?;
        }
        self.set_state(UploadState::Hashing);

        let site = Site::from_url(&record.problem_url).unwrap_or(Site::LeetCode);
        let by_language = self.storage.org_option().await? == OrgOption::Language;
        let layout = Layout::new(record, site.platform(), by_language);
        let source_key = format!("{}/{}", hook, layout.source);
        let branch = match stats.branch(&hook) {
            Some(b) => b.to_string(),
            None => remote.default_branch().await?,
        };
        let url = tree_url(&hook, &branch, &layout.directory);

        if stats.hash_at(&source_key) == Some(blob_hash(&record.source_code).as_str()) {
            info!("{} is unchanged, nothing to commit", layout.source);
            return Ok(Outcome::Unchanged { url });
        }

        self.set_state(UploadState::Committing);
        let readme = self.readme.render(record)?;
        let head = remote.reference(&branch).await?;
        let blobs: [Blob; 2] = [
            remote
                .create_blob(&record.source_code, &layout.source)
                .await?,
            remote.create_blob(&readme, &layout.readme).await?,
        ];
        let tree = remote.create_tree(&head.sha, &blobs).await?;
        let commit = remote
            .create_commit(&format!("Add solution for {}", record.title), &tree, &head.sha)
            .await?;
        remote.update_ref(&head.reference, &commit).await?;
        info!("Committed {} to {} as {}", layout.directory, hook, commit);

        for blob in blobs.iter() {
            stats.set_hash(&format!("{}/{}", hook, blob.path), &blob.sha);
        }
        stats.problems.insert(
            record.title.clone(),
            Problem {
                id: Utc::now().timestamp_millis(),
                title: record.title.clone(),
                difficulty: record
                    .difficulty
                    .map_or_else(|| String::from("Unknown"), |d| d.to_string()),
                tags: record.tags.clone(),
            },
        );
        self.storage.save_stats(&stats).await?;
        Ok(Outcome::Uploaded { url, commit })
    }
}
