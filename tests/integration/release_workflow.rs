//! End-to-end release workflows through the real client and tag helper

use super::common::{init_tracing, FakeGitHub, HEAD_SHA, OWNER, REPO};
use ghrel::{GhrelError, NewRelease};
use std::fs;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_create_with_fresh_tag_then_get() {
    init_tracing();
    let (_server, fake) = FakeGitHub::start().await;
    let manager = fake.manager();
    let cancel = CancellationToken::new();

    let temp = TempDir::new().unwrap();
    let asset = temp.path().join("app-linux-x86_64.tar.gz");
    fs::write(&asset, b"release payload").unwrap();

    let request = NewRelease::new("v1.0.0")
        .name("1.0.0")
        .body("First stable release");
    let created = manager
        .create(OWNER, REPO, &request, &asset, &cancel)
        .await
        .unwrap();

    assert_eq!(created.tag_name, "v1.0.0");
    assert_eq!(created.asset_names(), vec!["app-linux-x86_64.tar.gz"]);
    assert_eq!(fake.tag_sha("v1.0.0").as_deref(), Some(HEAD_SHA));

    let fetched = manager
        .get(OWNER, REPO, "v1.0.0", &cancel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.asset_names(), vec!["app-linux-x86_64.tar.gz"]);
    assert_eq!(fetched.assets[0].size, 15);
}

#[tokio::test]
async fn test_create_reuses_existing_tag() {
    init_tracing();
    let (_server, fake) = FakeGitHub::start().await;
    fake.add_tag("v2.0.0", "0123456789abcdef0123456789abcdef01234567");
    let manager = fake.manager();

    let temp = TempDir::new().unwrap();
    let asset = temp.path().join("notes.txt");
    fs::write(&asset, b"notes").unwrap();

    manager
        .create(
            OWNER,
            REPO,
            &NewRelease::new("v2.0.0"),
            &asset,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        fake.tag_sha("v2.0.0").as_deref(),
        Some("0123456789abcdef0123456789abcdef01234567")
    );
}

#[tokio::test]
async fn test_create_with_missing_asset_leaves_repo_untouched() {
    init_tracing();
    let (_server, fake) = FakeGitHub::start().await;
    let manager = fake.manager();
    let temp = TempDir::new().unwrap();

    let err = manager
        .create(
            OWNER,
            REPO,
            &NewRelease::new("v1.0.0"),
            &temp.path().join("missing.zip"),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GhrelError::FileNotFound(_)));
    assert_eq!(fake.release_count(), 0);
    assert!(fake.tag_sha("v1.0.0").is_none());
}

#[tokio::test]
async fn test_delete_release_and_tag() {
    init_tracing();
    let (_server, fake) = FakeGitHub::start().await;
    fake.add_tag("v1.0.0", HEAD_SHA);
    fake.add_release("v1.0.0", "2026-02-01T10:00:00Z", &[]);
    let manager = fake.manager();
    let cancel = CancellationToken::new();

    assert!(manager
        .delete(OWNER, REPO, "v1.0.0", true, &cancel)
        .await
        .unwrap());
    assert_eq!(fake.release_count(), 0);
    assert!(fake.tag_sha("v1.0.0").is_none());

    assert!(!manager
        .delete(OWNER, REPO, "v1.0.0", true, &cancel)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_download_latest_assets() {
    init_tracing();
    let (_server, fake) = FakeGitHub::start().await;
    fake.add_release(
        "v1.0.0",
        "2026-01-10T00:00:00Z",
        &[("app-1.0.0.zip", b"old".as_slice())],
    );
    fake.add_release(
        "v1.1.0",
        "2026-03-10T00:00:00Z",
        &[
            ("app-1.1.0-linux.tar.gz", b"linux".as_slice()),
            ("app-1.1.0-windows.zip", b"windows".as_slice()),
        ],
    );
    let manager = fake.manager();

    let temp = TempDir::new().unwrap();
    let out = temp.path().join("downloads");
    let mut saved = manager
        .download_all_latest_release_assets(OWNER, REPO, &out, &CancellationToken::new())
        .await
        .unwrap();
    saved.sort();

    assert_eq!(
        saved,
        vec![
            out.join("app-1.1.0-linux.tar.gz"),
            out.join("app-1.1.0-windows.zip")
        ]
    );
    assert_eq!(fs::read(out.join("app-1.1.0-linux.tar.gz")).unwrap(), b"linux");
    assert!(!out.join("app-1.0.0.zip").exists());
}

#[tokio::test]
async fn test_download_by_name_pattern() {
    init_tracing();
    let (_server, fake) = FakeGitHub::start().await;
    fake.add_release(
        "v3.0.0",
        "2026-04-01T00:00:00Z",
        &[
            ("Tool-macOS-arm64.zip", b"mac".as_slice()),
            ("Tool-Windows-x64.zip", b"win".as_slice()),
        ],
    );
    let manager = fake.manager();
    let temp = TempDir::new().unwrap();
    let cancel = CancellationToken::new();

    let saved = manager
        .download_release_asset_by_name_pattern(OWNER, REPO, temp.path(), &["windows", "X64"], &cancel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved, temp.path().join("Tool-Windows-x64.zip"));
    assert_eq!(fs::read(&saved).unwrap(), b"win");

    let missing = manager
        .download_release_asset_by_name_pattern(OWNER, REPO, temp.path(), &["linux"], &cancel)
        .await
        .unwrap();
    assert!(missing.is_none());
}
