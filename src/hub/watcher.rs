extern crate serde_json;
extern crate tokio;

use crate::{
    config::watcher::{CONTEXT_WAIT_COUNT, CONTEXT_WAIT_DELAY},
    judge::{Judge, Site},
    storage::{Changes, ENABLED},
    upload::{Outcome, SlotState, UploadCoordinator, UploadState},
};
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::JoinHandle,
    time::sleep,
};

pub mod page;

pub use page::{Detached, Host, MutationBatch, Page, PageEvent, Snapshot};

/// Watches one page for an accepted verdict and hands the extracted record
/// to the [`UploadCoordinator`].
pub struct SubmissionWatcher {
    page: Arc<dyn Page>,
    host: Arc<dyn Host>,
    judge: Arc<Judge>,
    coordinator: Arc<UploadCoordinator>,
    site: Option<Site>,
}
impl SubmissionWatcher {
    pub fn new(
        page: Arc<dyn Page>,
        host: Arc<dyn Host>,
        judge: Arc<Judge>,
        coordinator: Arc<UploadCoordinator>,
    ) -> Self {
        SubmissionWatcher {
            page,
            host,
            judge,
            coordinator,
            site: None,
        }
    }

    pub fn is_observing(&self) -> bool {
        self.site.is_some()
    }

    async fn wait_context(&self) -> bool {
        for attempt in 0..CONTEXT_WAIT_COUNT {
            if self.host.is_context_valid() {
                return true;
            }
            debug!("Host context not ready (attempt {})", attempt + 1);
            sleep(CONTEXT_WAIT_DELAY).await;
        }
        self.host.is_context_valid()
    }

    /// Attach to the current page if it belongs to a known judge and uploads
    /// are enabled. Returns whether the watcher is observing afterwards.
    pub async fn init(&mut self) -> bool {
        if self.is_observing() {
            debug!("Already observing {}", self.page.url());
            return true;
        }
        if !self.wait_context().await {
            warn!("Host context is invalid, not observing");
            return false;
        }
        let url = self.page.url();
        let site = match Site::from_url(&url) {
            Some(s) => s,
            None => {
                debug!("{} is not a judge page", url);
                return false;
            }
        };
        match self.coordinator.storage().is_enabled().await {
            Ok(true) => {
                info!("Watching {} for accepted submissions", url);
                self.site = Some(site);
                true
            }
            Ok(false) => {
                debug!("Uploads are disabled, not observing {}", url);
                false
            }
            Err(e) => {
                warn!("Can't read enabled flag: {}", e);
                false
            }
        }
    }

    pub fn teardown(&mut self) {
        if self.site.take().is_some() {
            debug!("Stopped observing {}", self.page.url());
        }
    }

    /// React to one page event. Returns the spawned upload, if the event
    /// started one.
    pub async fn handle(&mut self, event: PageEvent) -> Option<JoinHandle<Outcome>> {
        match event {
            PageEvent::Mutations(batch) => self.on_mutations(&batch),
            PageEvent::Navigated { url } => {
                debug!("Navigated to {}", url);
                self.teardown();
                self.init().await;
                None
            }
            PageEvent::Unloaded => {
                self.teardown();
                None
            }
        }
    }

    fn on_mutations(&mut self, batch: &MutationBatch) -> Option<JoinHandle<Outcome>> {
        let site = self.site?;
        if !self.host.is_context_valid() {
            warn!("Host context invalidated, stop observing");
            self.teardown();
            return None;
        }
        if batch.added.is_empty() || self.coordinator.slot_state() == SlotState::Busy {
            return None;
        }
        if !batch.added.iter().any(|node| self.judge.is_accepted(node)) {
            return None;
        }
        let guard = match self.coordinator.try_begin() {
            Some(g) => g,
            None => return None,
        };
        self.coordinator.set_state(UploadState::Detected);
        info!("Accepted submission detected on {}", site);

        self.coordinator.set_state(UploadState::Extracting);
        let mut record = self.judge.parse(&self.page.document(), site);
        if record.problem_url.is_empty() {
            record.problem_url = self.page.url();
        }
        let coordinator = self.coordinator.clone();
        let page = self.page.clone();
        Some(tokio::spawn(async move {
            let _guard = guard;
            let outcome = coordinator.process_submission(&record).await;
            if let Some(url) = outcome.url() {
                page.mark_uploaded(url);
            }
            outcome
        }))
    }

    async fn on_change(&mut self, changes: &Changes) {
        let change = match changes.items.get(ENABLED) {
            Some(c) => c,
            None => return,
        };
        if change.new_value == Some(Value::Bool(true)) {
            self.init().await;
        } else {
            info!("Uploads disabled");
            self.teardown();
        }
    }

    /// Drive the watcher until the event stream ends, then wait for the
    /// uploads it started.
    pub async fn run(mut self, mut events: mpsc::Receiver<PageEvent>) -> Vec<Outcome> {
        let mut changes = self.coordinator.storage().subscribe();
        let mut pending = Vec::new();
        self.init().await;
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => pending.extend(self.handle(event).await),
                    None => break,
                },
                change = changes.recv() => match change {
                    Ok(c) => self.on_change(&c).await,
                    Err(RecvError::Lagged(n)) => warn!("Missed {} store notifications", n),
                    Err(RecvError::Closed) => break,
                },
            }
        }
        self.teardown();
        let mut outcomes = Vec::with_capacity(pending.len());
        for task in pending {
            match task.await {
                Ok(o) => outcomes.push(o),
                Err(e) => warn!("Upload task ended abnormally: {}", e),
            }
        }
        outcomes
    }
}
