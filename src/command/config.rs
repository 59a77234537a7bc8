extern crate termcolor;

use crate::{
    read::{read_choice, read_line},
    write::{write_result, write_status},
};
use judgehub::{
    oauth::OAuth2,
    storage::{OrgOption, Storage},
    VERSION,
};
use reqwest::Url;
use std::io::Write;
use termcolor::{Color, StandardStream};

#[allow(unused_must_use)]
pub async fn authorize(stdout: &mut StandardStream, storage: &Storage) {
    let oauth = OAuth2::new(
        &read_line(stdout, b"Client id: "),
        &read_line(stdout, b"Client secret: "),
    );
    match oauth.begin(storage).await {
        Ok(url) => write_info!(stdout, "Info", "Visit {}", url),
        Err(e) => {
            write_error!(stdout, "Error", "{}", e);
            return;
        }
    }
    let redirect = read_line(stdout, b"Redirected url: ");
    let url = match Url::parse(&redirect) {
        Ok(u) => u,
        Err(e) => {
            write_error!(stdout, "Error", "parse: {}", e);
            return;
        }
    };
    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default()
    };
    write_result(
        stdout,
        oauth
            .complete(storage, &query("code"), &query("state"))
            .await,
        "Authorized",
    );
}

pub async fn token(stdout: &mut StandardStream, storage: &Storage) {
    let token = read_line(stdout, b"Token: ");
    write_result(stdout, storage.save_token(token.trim()).await, "Token stored");
}

#[allow(unused_must_use)]
pub async fn hook(stdout: &mut StandardStream, storage: &Storage) {
    let hook = read_line(stdout, b"Repository (owner/name): ");
    let hook = hook.trim().trim_matches('/');
    if hook.split('/').filter(|p| !p.is_empty()).count() != 2 {
        write_error!(stdout, "Error", "Expected owner/name, got {}", hook);
        return;
    }
    write_result(
        stdout,
        storage.save_hook(hook).await,
        &format!("Hooked {}", hook),
    );
}

pub async fn unlink(stdout: &mut StandardStream, storage: &Storage) {
    write_result(stdout, storage.unhook().await, "Repository unlinked");
}

pub async fn logout(stdout: &mut StandardStream, storage: &Storage) {
    write_result(stdout, storage.deauthorize().await, "Credential removed");
}

pub async fn set_enabled(stdout: &mut StandardStream, storage: &Storage, enabled: bool) {
    write_result(
        stdout,
        storage.save_enabled(enabled).await,
        if enabled {
            "Uploads enabled"
        } else {
            "Uploads disabled"
        },
    );
}

pub async fn organize(stdout: &mut StandardStream, storage: &Storage) {
    let option = match read_choice(stdout, b"Organize by (platform/language): ", &["platform", "language"]) {
        "language" => OrgOption::Language,
        _ => OrgOption::Platform,
    };
    write_result(
        stdout,
        storage.save_org_option(option).await,
        &format!("Organizing by {}", option),
    );
}

#[allow(unused_must_use)]
pub async fn status(stdout: &mut StandardStream, storage: &Storage) {
    let result = async {
        Ok::<_, judgehub::storage::Error>((
            storage.hook().await?,
            storage.token().await?.is_some(),
            storage.is_enabled().await?,
            storage.org_option().await?,
            storage.stats().await?,
        ))
    }
    .await;
    match result {
        Ok((hook, authorized, enabled, org, stats)) => {
            write_info!(stdout, "Version", "{}", VERSION);
            write_status(stdout, hook.as_deref(), authorized, enabled, org, &stats);
        }
        Err(e) => write_error!(stdout, "Error", "{}", e),
    }
}
