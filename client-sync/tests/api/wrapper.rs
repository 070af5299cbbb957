use std::sync::Arc;

use client_sync::{AuthStore, MemoryStorage};
use payloads::{BearerToken, RequestOptions};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use test_helpers::spawn_app;

#[tokio::test]
async fn attaches_bearer_token_when_held() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let token = app.issue_token("t-123");
    let client = app.client_with(Arc::new(token));

    client.list_subscriptions().await?;

    let seen = app.store.requests_to("/api/subscriptions/");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer t-123"));
    Ok(())
}

#[tokio::test]
async fn omits_header_without_token() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let store = AuthStore::new(Arc::new(MemoryStorage::new()));
    let client = app.client_with(Arc::new(store));

    client.recent_recalls(None).await?;

    let seen = app.store.requests_to("/api/recalls/recent");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization, None);
    Ok(())
}

#[tokio::test]
async fn non_2xx_is_returned_not_raised() -> anyhow::Result<()> {
    let app = spawn_app().await;

    // no token, so the server refuses
    let response = app
        .client
        .request("/api/subscriptions/", RequestOptions::get())
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn caller_headers_are_kept() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.issue_token("stored");
    app.issue_token("explicit");
    let client = app.client_with(Arc::new(BearerToken::new("stored")));

    let mut options = RequestOptions::get();
    options
        .headers
        .insert(AUTHORIZATION, HeaderValue::from_static("Bearer explicit"));
    options
        .headers
        .insert("x-request-source", HeaderValue::from_static("test"));
    let response = client.request("/api/items", options).await?;
    assert!(response.status().is_success());

    let seen = app.store.requests_to("/api/items");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer explicit"));
    Ok(())
}

#[tokio::test]
async fn token_changes_apply_to_the_next_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let store = AuthStore::new(Arc::new(MemoryStorage::new()));
    let client = app.client_with(Arc::new(store.clone()));

    client.recent_recalls(None).await?;
    store.login(app.issue_token("later"));
    client.recent_recalls(None).await?;
    store.logout();
    client.recent_recalls(None).await?;

    let headers: Vec<_> = app
        .store
        .requests_to("/api/recalls/recent")
        .into_iter()
        .map(|r| r.authorization)
        .collect();
    assert_eq!(headers, vec![None, Some("Bearer later".to_string()), None]);
    Ok(())
}
