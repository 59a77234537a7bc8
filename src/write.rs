extern crate termcolor;

use judgehub::{stats::Stats, storage::OrgOption};
use std::{fmt::Display, io::Write};
use termcolor::{Color, StandardStream};

#[allow(unused_must_use)]
pub fn write_result<E: Display>(stdout: &mut StandardStream, result: Result<(), E>, success: &str) {
    match result {
        Ok(_) => write_ok!(stdout, "Success", "{}", success),
        Err(e) => write_error!(stdout, "Error", "{}", e),
    }
}

#[allow(unused_must_use)]
pub fn write_status(
    stdout: &mut StandardStream,
    hook: Option<&str>,
    authorized: bool,
    enabled: bool,
    org: OrgOption,
    stats: &Stats,
) {
    write_info!(stdout, "Hook", "{}", hook.unwrap_or("(none)"));
    write_info!(
        stdout,
        "Token",
        "{}",
        if authorized { "stored" } else { "(none)" }
    );
    write_info!(stdout, "Enabled", "{}", enabled);
    write_info!(stdout, "Org", "{}", org);
    write_info!(
        stdout,
        "Cache",
        "version {}, branch {}",
        stats.version.as_deref().unwrap_or("(none)"),
        hook.and_then(|h| stats.branch(h)).unwrap_or("(unknown)")
    );
    write_info!(stdout, "Solved", "{} problems", stats.problems.len());
    let mut problems: Vec<_> = stats.problems.values().collect();
    problems.sort_by_key(|p| p.id);
    for p in problems {
        writeln!(stdout, "         {} [{}] {}", p.title, p.difficulty, p.tags.join(", "));
    }
}
