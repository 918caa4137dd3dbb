#![allow(clippy::unwrap_used)]
// Smoke tests for the `skymirror` binary: flag handling and the pure
// `url` subcommand (no network involved).

use assert_cmd::Command;
use predicates::prelude::*;

fn skymirror() -> Command {
    Command::cargo_bin("skymirror").unwrap()
}

#[test]
fn version_flag_prints_name_and_version() {
    skymirror()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skymirror"));
}

#[test]
fn no_args_shows_help() {
    skymirror()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn url_translates_at_uri() {
    skymirror()
        .args([
            "url",
            "at://did:plc:abc123/app.bsky.feed.post/xyz789",
            "alice.bsky.social",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://bsky.app/profile/alice.bsky.social/post/xyz789",
        ));
}

#[test]
fn url_is_deterministic() {
    let run = || {
        skymirror()
            .args([
                "url",
                "at://did:plc:abc123/app.bsky.feed.post/xyz789",
                "alice.bsky.social",
            ])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn watch_rejects_missing_manifest() {
    skymirror()
        .args(["watch", "/nonexistent/page.toml"])
        .assert()
        .failure();
}
