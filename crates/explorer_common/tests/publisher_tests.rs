//! Tests for publisher.rs against a real git binary

use explorer_common::config::PublishConfig;
use explorer_common::GitPublisher;
use explorer_shared::persist::Publisher;
use explorer_shared::PersistenceError;
use std::path::{Path, PathBuf};
use std::process::Command;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Repository on `main` with one commit and a local identity.
fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.email", "explorer@example.com"]);
    git(dir, &["config", "user.name", "Explorer"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["commit", "-q", "--allow-empty", "-m", "init"]);
}

fn local_publisher(repo_dir: &Path) -> GitPublisher {
    GitPublisher::new(&PublishConfig {
        enabled: true,
        repo_dir: repo_dir.to_path_buf(),
        branch: "main".to_string(),
        push: false,
    })
}

#[test]
fn test_publish_outside_repo_keeps_written_path() {
    let tmp = tempfile::tempdir().unwrap();
    let written = PathBuf::from("local_outputs/explorer_4_20260101_000000_gauntlet.txt");

    let err = local_publisher(tmp.path())
        .publish("Cycle 4: x", "BOUNDARY: x", &written)
        .unwrap_err();

    match err {
        PersistenceError::Publish {
            written: reported,
            reason,
        } => {
            assert_eq!(reported, written);
            assert!(reason.contains("git checkout"), "reason: {}", reason);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_publish_missing_repo_dir_is_publish_error() {
    let tmp = tempfile::tempdir().unwrap();
    let written = PathBuf::from("run.txt");

    let err = local_publisher(&tmp.path().join("gone"))
        .publish("t", "b", &written)
        .unwrap_err();
    assert_eq!(err.written(), Some(&written));
}

#[test]
fn test_publish_commits_title_and_body() {
    let tmp = tempfile::tempdir().unwrap();
    init_repo(tmp.path());
    std::fs::write(tmp.path().join("transcript.txt"), "cycle output").unwrap();

    local_publisher(tmp.path())
        .publish(
            "Cycle 5: Ice is slippery → Mapped topology",
            "BOUNDARY: Ice is slippery\nCONFIDENCE: 0.80",
            &tmp.path().join("transcript.txt"),
        )
        .unwrap();

    assert_eq!(
        git(tmp.path(), &["log", "-1", "--format=%s"]),
        "Cycle 5: Ice is slippery → Mapped topology"
    );
    assert!(git(tmp.path(), &["log", "-1", "--format=%b"]).contains("CONFIDENCE: 0.80"));
    assert_eq!(git(tmp.path(), &["rev-list", "--count", "HEAD"]), "2");
    // the new file went into the commit
    assert_eq!(
        git(tmp.path(), &["show", "--name-only", "--format=", "HEAD"]),
        "transcript.txt"
    );
}
