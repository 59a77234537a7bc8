extern crate clap;
extern crate pretty_env_logger;
extern crate termcolor;
extern crate tokio;

use clap::{crate_description, crate_name, crate_version, Arg, Command};
use judgehub::{
    github::GitHubConnector,
    judge::Judge,
    storage::{Storage, YamlStore},
    upload::UploadCoordinator,
    VERSION,
};
use pretty_env_logger::init_timed;
use std::{io::Write, sync::Arc};
use termcolor::{Color, ColorChoice, StandardStream, WriteColor};

#[macro_use]
mod color;
mod command {
    pub mod config;
    pub mod upload;
}
mod read;
mod write;

use command::{config, upload};
use read::read_line;

#[allow(unused_must_use)]
#[tokio::main]
async fn main() {
    init_timed();
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let app = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::new("store")
                .help("Path to the settings file")
                .default_value("judgehub.yaml"),
        )
        .arg(
            Arg::new("sync")
                .long("sync")
                .takes_value(true)
                .help("Settings file to copy credentials and cache from once"),
        )
        .arg(
            Arg::new("api")
                .long("api")
                .takes_value(true)
                .help("GitHub API base url"),
        )
        .get_matches();

    let path = app.value_of("store").unwrap_or("judgehub.yaml");
    let storage = match YamlStore::open(path) {
        Ok(s) => Storage::new(Arc::new(s)),
        Err(e) => {
            write_error!(&mut stdout, "Error", "Error open {}: {}", path, e);
            return;
        }
    };
    if let Some(f) = app.value_of("sync") {
        match YamlStore::open(f) {
            Ok(other) => match storage.sync_from(&other).await {
                Ok(true) => write_ok!(&mut stdout, "Success", "Copied settings from {}", f),
                Ok(false) => {}
                Err(e) => write_error!(&mut stdout, "Error", "sync: {}", e),
            },
            Err(e) => write_error!(&mut stdout, "Error", "Error open {}: {}", f, e),
        }
    }
    if let Err(e) = storage.init_stats(VERSION).await {
        write_error!(&mut stdout, "Error", "Error loading stats: {}", e);
    }
    let connector = match app.value_of("api") {
        Some(api) => GitHubConnector::with_api(api),
        None => GitHubConnector::new(),
    };
    let connector = match connector {
        Ok(c) => Arc::new(c),
        Err(e) => {
            write_error!(&mut stdout, "Error", "{}", e);
            return;
        }
    };
    let coordinator = Arc::new(UploadCoordinator::new(storage.clone(), connector, VERSION));
    let judge = Arc::new(Judge::new());
    stdout.reset();

    loop {
        match read_line(&mut stdout, b"judgehub> ").trim() {
            "auth" => config::authorize(&mut stdout, &storage).await,
            "token" => config::token(&mut stdout, &storage).await,
            "logout" => config::logout(&mut stdout, &storage).await,
            "hook" => config::hook(&mut stdout, &storage).await,
            "unlink" => config::unlink(&mut stdout, &storage).await,
            "enable" => config::set_enabled(&mut stdout, &storage, true).await,
            "disable" => config::set_enabled(&mut stdout, &storage, false).await,
            "org" => config::organize(&mut stdout, &storage).await,
            "status" => config::status(&mut stdout, &storage).await,
            "resync" => upload::resync(&mut stdout, &coordinator).await,
            "upload" => upload::upload(&mut stdout, &judge, &coordinator).await,
            "replay" => upload::replay(&mut stdout, &judge, &coordinator).await,
            "exit" => break,
            "" => {}
            unknown => write_error!(
                &mut stdout,
                "Error",
                r#"judgehub: unknown command "{}""#,
                unknown
            ),
        }
        stdout.reset();
    }
}
