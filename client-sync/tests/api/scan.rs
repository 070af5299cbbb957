use std::sync::Arc;

use client_sync::{MemoryStorage, ScanCache, ScanOutcome, scan_code};
use payloads::RecallStatus;
use reqwest::StatusCode;

use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn unknown_code_is_safe() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let cache = ScanCache::recent_scans(Arc::new(MemoryStorage::new()));

    let outcome = scan_code(&app.client, &cache, "036000291452").await?;

    assert_eq!(outcome, ScanOutcome::Safe);
    assert!(outcome.indicator().contains("Safe"));
    assert_eq!(outcome.details_url(), None);
    Ok(())
}

#[tokio::test]
async fn recalled_code_carries_notice_link() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.mark_recalled(
        "012345678905",
        "https://recalls.example.com/cpsc/2",
        "Folding Stroller",
    );
    let cache = ScanCache::recent_scans(Arc::new(MemoryStorage::new()));

    let outcome = scan_code(&app.client, &cache, " 012345678905 ").await?;

    assert!(outcome.is_recalled());
    assert_eq!(
        outcome.details_url(),
        Some("https://recalls.example.com/cpsc/2")
    );
    assert_eq!(app.store.requests_to("/api/check/012345678905").len(), 1);
    Ok(())
}

#[tokio::test]
async fn scans_are_remembered_newest_first() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store
        .mark_recalled("111", "https://recalls.example.com/fda/1", "Crackers");
    let storage = Arc::new(MemoryStorage::new());
    let cache = ScanCache::recent_scans(storage.clone());

    scan_code(&app.client, &cache, "111").await?;
    scan_code(&app.client, &cache, "222").await?;

    // a fresh handle over the same storage sees the same history
    let entries = ScanCache::recent_scans(storage).load();
    let codes: Vec<_> = entries.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, ["222", "111"]);
    assert_eq!(entries[1].result.status, RecallStatus::Recalled);
    Ok(())
}

#[tokio::test]
async fn rejected_code_is_not_cached() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let cache = ScanCache::recent_scans(Arc::new(MemoryStorage::new()));

    let result = scan_code(&app.client, &cache, "not-a-upc").await;
    match result {
        Err(client_sync::SyncError::Client(e)) => {
            assert_status_code::<()>(Err(e), StatusCode::BAD_REQUEST)
        }
        other => panic!("expected a client error, got {other:?}"),
    }
    assert!(cache.load().is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_code_is_a_validation_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let cache = ScanCache::recent_scans(Arc::new(MemoryStorage::new()));

    let errors = scan_code(&app.client, &cache, "  ").await.unwrap_err();

    assert!(errors.field_errors().is_some());
    assert!(app.store.requests().is_empty());
    Ok(())
}
