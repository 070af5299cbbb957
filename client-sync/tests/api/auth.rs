use std::sync::Arc;

use client_sync::{AuthStore, MemoryStorage, TOKEN_KEY, login_with_credentials};
use client_sync::{KeyValueStorage, forms};
use payloads::{ClientError, requests::LoginCredentials, requests::Plan};
use reqwest::StatusCode;

use test_helpers::{
    LoginRefusal, alice_credentials, assert_status_code, spawn_app,
};

fn fresh_store() -> (Arc<MemoryStorage>, AuthStore) {
    let storage = Arc::new(MemoryStorage::new());
    let store = AuthStore::new(storage.clone());
    (storage, store)
}

#[tokio::test]
async fn login_stores_token_and_later_requests_send_it() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    app.create_alice_user();
    let (storage, store) = fresh_store();
    let client = app.client_with(Arc::new(store.clone()));

    login_with_credentials(&client, &store, &alice_credentials()).await?;

    assert!(store.is_authenticated());
    let persisted = storage.get(TOKEN_KEY)?;
    assert!(persisted.is_some_and(|t| t.starts_with("token-")));

    client.list_items().await?;
    let sent = app.store.requests_to("/api/items");
    let header = sent[0].authorization.clone().unwrap_or_default();
    assert!(header.starts_with("Bearer token-"));
    Ok(())
}

#[tokio::test]
async fn ok_false_leaves_token_unset() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user();
    let (storage, store) = fresh_store();

    let wrong = LoginCredentials::new("alice@example.com", "nope");
    let result = login_with_credentials(&app.client, &store, &wrong).await;

    assert!(matches!(
        result,
        Err(client_sync::SyncError::Client(ClientError::InvalidCredentials))
    ));
    assert!(!store.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY)?, None);
    Ok(())
}

#[tokio::test]
async fn unauthorized_refusal_is_invalid_credentials() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_login_refusal(LoginRefusal::Unauthorized);
    let (_storage, store) = fresh_store();

    let result =
        login_with_credentials(&app.client, &store, &alice_credentials())
            .await;

    assert!(matches!(
        result,
        Err(client_sync::SyncError::Client(ClientError::InvalidCredentials))
    ));
    assert!(store.get().is_none());
    Ok(())
}

#[tokio::test]
async fn blank_credentials_are_not_sent() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_storage, store) = fresh_store();

    let blank = LoginCredentials::new("", "");
    let errors = login_with_credentials(&app.client, &store, &blank)
        .await
        .unwrap_err();

    let fields = errors.field_errors().expect("validation error");
    assert!(fields.get(forms::EMAIL).is_some());
    assert!(fields.get(forms::PASSWORD).is_some());
    assert!(app.store.requests_to("/api/auth/login").is_empty());
    Ok(())
}

#[tokio::test]
async fn logout_stops_sending_the_token() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user();
    let (storage, store) = fresh_store();
    let client = app.client_with(Arc::new(store.clone()));
    login_with_credentials(&client, &store, &alice_credentials()).await?;

    store.logout();
    assert_status_code(client.list_items().await, StatusCode::UNAUTHORIZED);

    assert_eq!(storage.get(TOKEN_KEY)?, None);
    assert_eq!(app.store.requests_to("/api/items")[0].authorization, None);
    Ok(())
}

#[tokio::test]
async fn restored_session_is_used_immediately() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let token = app.issue_token("remembered");
    let (storage, store) = fresh_store();
    store.login(token);
    drop(store);

    let restored = AuthStore::restore(storage);
    let client = app.client_with(Arc::new(restored));
    client.list_subscriptions().await?;
    Ok(())
}

#[tokio::test]
async fn checkout_requires_a_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    assert_status_code(
        app.client.checkout(Plan::Pro).await,
        StatusCode::UNAUTHORIZED,
    );

    let client = app.client_with(Arc::new(app.issue_token("paying")));
    let session = client.checkout(Plan::Pro).await?;
    assert!(session.url.contains("plan=pro"));
    Ok(())
}

#[tokio::test]
async fn billing_portal_is_an_authenticated_post() -> anyhow::Result<()> {
    let app = spawn_app().await;
    assert_status_code(
        app.client.billing_portal().await,
        StatusCode::UNAUTHORIZED,
    );

    let client = app.client_with(Arc::new(app.issue_token("paying")));
    // no billing account before the first checkout
    assert_status_code(client.billing_portal().await, StatusCode::NOT_FOUND);

    client.checkout(Plan::Pro).await?;
    let portal = client.billing_portal().await?;
    assert!(portal.url.starts_with("https://billing.example.com/portal/"));

    let sent = app.store.requests_to("/api/billing/portal");
    assert!(sent.iter().all(|r| r.method == "POST"));
    assert_eq!(sent[2].authorization.as_deref(), Some("Bearer paying"));
    Ok(())
}
