extern crate termcolor;

use crate::read::{read_file, read_line};
use judgehub::{
    judge::{Judge, Site},
    upload::{Outcome, UploadCoordinator},
    watcher::{Detached, PageEvent, Snapshot, SubmissionWatcher},
};
use std::{io::Write, sync::Arc};
use termcolor::{Color, StandardStream};

#[allow(unused_must_use)]
fn write_outcome(stdout: &mut StandardStream, outcome: &Outcome) {
    match outcome {
        Outcome::Skipped => write_error!(stdout, "Skip", "No title or source code found"),
        Outcome::Unchanged { url } => write_ok!(stdout, "Same", "Already uploaded: {}", url),
        Outcome::Uploaded { url, commit } => {
            write_ok!(stdout, "Success", "Committed {}: {}", commit, url)
        }
        Outcome::Failed => write_error!(stdout, "Fail", "Upload failed, see log for details"),
    }
}

#[allow(unused_must_use)]
pub async fn resync(stdout: &mut StandardStream, coordinator: &UploadCoordinator) {
    write_progress!(stdout, "Sync", "Reading remote tree");
    match coordinator.resync().await {
        Ok(stats) => write_ok!(
            stdout,
            "Success",
            "Hash cache rebuilt for version {}",
            stats.version.as_deref().unwrap_or_default()
        ),
        Err(e) => write_error!(stdout, "Error", "{}", e),
    }
}

/// Upload the solution in a saved problem page.
#[allow(unused_must_use)]
pub async fn upload(stdout: &mut StandardStream, judge: &Judge, coordinator: &UploadCoordinator) {
    let url = read_line(stdout, b"Problem url: ");
    let site = match Site::from_url(&url) {
        Some(s) => s,
        None => {
            write_error!(stdout, "Error", "{} is not a supported judge page", url);
            return;
        }
    };
    let document = read_file(stdout, b"Snapshot path: ");
    let mut record = judge.parse(&document, site);
    if record.problem_url.is_empty() {
        record.problem_url = url;
    }
    let _guard = match coordinator.try_begin() {
        Some(g) => g,
        None => {
            write_error!(stdout, "Error", "Another upload is running");
            return;
        }
    };
    write_progress!(stdout, "Upload", "{} ({})", record.title, record.language);
    let outcome = coordinator.process_submission(&record).await;
    write_outcome(stdout, &outcome);
}

/// Feed a recorded event script through a watcher attached to a snapshot.
#[allow(unused_must_use)]
pub async fn replay(
    stdout: &mut StandardStream,
    judge: &Arc<Judge>,
    coordinator: &Arc<UploadCoordinator>,
) {
    let url = read_line(stdout, b"Page url: ");
    let document = read_file(stdout, b"Snapshot path: ");
    let events: Vec<PageEvent> = match serde_yaml::from_str(&read_file(stdout, b"Script path: ")) {
        Ok(v) => v,
        Err(e) => {
            write_error!(stdout, "Error", "parse script: {}", e);
            return;
        }
    };
    let page = Arc::new(Snapshot::new(&url, &document));
    let mut watcher =
        SubmissionWatcher::new(page.clone(), Arc::new(Detached), judge.clone(), coordinator.clone());
    if !watcher.init().await {
        write_info!(stdout, "Info", "Watcher not attached; is uploading enabled?");
    }
    write_progress!(stdout, "Replay", "{} events", events.len());
    let mut pending = Vec::new();
    for event in events {
        if let PageEvent::Navigated { url } = &event {
            page.set_url(url);
        }
        pending.extend(watcher.handle(event).await);
    }
    for task in pending {
        match task.await {
            Ok(outcome) => write_outcome(stdout, &outcome),
            Err(e) => write_error!(stdout, "Error", "upload task: {}", e),
        }
    }
    if let Some(marker) = page.marker() {
        write_info!(stdout, "Marker", "{}", marker);
    }
}
