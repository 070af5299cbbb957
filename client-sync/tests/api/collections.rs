use std::sync::Arc;

use client_sync::{
    CollectionSync, FetchState, Subscriptions, SyncError, TrackedItems,
    forms,
};
use payloads::{
    ClientError, Profile, RecallStatus, SubscriptionId, TrackedItemId,
    requests,
};
use reqwest::StatusCode;

use test_helpers::{TestApp, spawn_app};

fn subscription(source: &str, query: &str) -> requests::NewSubscription {
    requests::NewSubscription {
        recall_source: source.into(),
        product_query: query.into(),
    }
}

fn item(upc: &str, profile: Profile) -> requests::NewTrackedItem {
    requests::NewTrackedItem {
        upc: upc.into(),
        label: None,
        profile,
    }
}

async fn signed_in() -> (TestApp, payloads::APIClient) {
    let app = spawn_app().await;
    let token = app.issue_token("alice-token");
    let client = app.client_with(Arc::new(token));
    (app, client)
}

#[tokio::test]
async fn load_preserves_server_order() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    for query in ["Kettle", "Stroller", "Crib", "Heater"] {
        app.store.add_subscription(subscription("cpsc", query));
    }

    let mut subs = CollectionSync::<Subscriptions>::new(client);
    subs.load().await?;

    let queries: Vec<_> =
        subs.items().iter().map(|s| s.product_query.as_str()).collect();
    assert_eq!(queries, ["Kettle", "Stroller", "Crib", "Heater"]);
    Ok(())
}

#[tokio::test]
async fn empty_server_list_is_empty_state() -> anyhow::Result<()> {
    let (_app, client) = signed_in().await;
    let mut items = CollectionSync::<TrackedItems>::new(client);
    items.load().await?;
    assert_eq!(items.collection().state(), &FetchState::Empty);
    Ok(())
}

#[tokio::test]
async fn failed_load_is_an_error_not_empty() -> anyhow::Result<()> {
    let app = spawn_app().await;
    // anonymous client: the server answers 401
    let mut subs = CollectionSync::<Subscriptions>::new(app.client.clone());

    let result = subs.load().await;
    assert!(matches!(
        result,
        Err(SyncError::Client(ClientError::APIError(
            StatusCode::UNAUTHORIZED,
            _
        )))
    ));
    assert!(subs.collection().state().error().is_some());
    Ok(())
}

#[tokio::test]
async fn failed_refresh_keeps_loaded_data() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    app.store.add_subscription(subscription("fda", "Crackers"));
    let mut subs = CollectionSync::<Subscriptions>::new(client);
    subs.load().await?;

    app.store.fail_next("GET", "/api/subscriptions/", 503);
    assert!(subs.load().await.is_err());

    assert_eq!(subs.items().len(), 1);
    assert!(subs.collection().refresh_error().is_some());
    Ok(())
}

#[tokio::test]
async fn delete_removes_exactly_that_id() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    let ids: Vec<SubscriptionId> = ["A", "B", "C"]
        .into_iter()
        .map(|q| app.store.add_subscription(subscription("cpsc", q)).id)
        .collect();
    let mut subs = CollectionSync::<Subscriptions>::new(client);
    subs.load().await?;

    subs.remove(&ids[1]).await?;

    let remaining: Vec<_> = subs.items().iter().map(|s| s.id).collect();
    assert_eq!(remaining, vec![ids[0], ids[2]]);
    assert_eq!(app.store.subscriptions().len(), 2);
    assert_eq!(
        app.store.requests_to(&format!("/api/subscriptions/{}", ids[1]))[0]
            .method,
        "DELETE"
    );
    Ok(())
}

#[tokio::test]
async fn failed_delete_keeps_the_item() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    let id = app.store.add_subscription(subscription("cpsc", "Kettle")).id;
    let mut subs = CollectionSync::<Subscriptions>::new(client);
    subs.load().await?;

    app.store
        .fail_next("DELETE", &format!("/api/subscriptions/{id}"), 500);
    assert!(subs.remove(&id).await.is_err());

    assert!(subs.collection().contains(&id));
    Ok(())
}

#[tokio::test]
async fn failed_optimistic_delete_rolls_back() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    let first = app.store.add_item(item("111", Profile::Myself));
    let second = app.store.add_item(item("222", Profile::Pet));
    let mut items = CollectionSync::<TrackedItems>::new(client);
    items.load().await?;
    let before = items.collection().clone();

    app.store.fail_next("DELETE", &format!("/api/items/{first}"), 502);
    assert!(items.remove_optimistic(&first).await.is_err());
    assert_eq!(items.collection(), &before);

    items.remove_optimistic(&second).await?;
    let remaining: Vec<_> = items.items().iter().map(|i| i.id).collect();
    assert_eq!(remaining, vec![first]);
    Ok(())
}

#[tokio::test]
async fn optimistic_delete_of_unknown_id_sends_nothing() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    let mut items = CollectionSync::<TrackedItems>::new(client);
    items.load().await?;

    let result = items.remove_optimistic(&TrackedItemId(99)).await;
    assert!(matches!(result, Err(SyncError::Missing(_))));
    assert!(app.store.requests_to("/api/items/99").is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_upc_never_reaches_the_network() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    let mut items = CollectionSync::<TrackedItems>::new(client);

    let result = items.create(&item("", Profile::Child)).await;

    let errors = result.unwrap_err();
    assert_eq!(
        errors.field_errors().and_then(|e| e.get(forms::UPC)),
        Some("UPC required")
    );
    assert!(app.store.requests_to("/api/items").is_empty());
    Ok(())
}

#[tokio::test]
async fn created_item_appears_after_refetch() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    app.store.mark_recalled("555", "https://example.com/r/1", "Crib");
    let mut items = CollectionSync::<TrackedItems>::new(client);
    items.load().await?;

    items
        .create(&requests::NewTrackedItem {
            upc: " 555 ".into(),
            label: Some("Nursery crib".into()),
            profile: Profile::Child,
        })
        .await?;

    assert_eq!(items.items().len(), 1);
    let created = &items.items()[0];
    assert_eq!(created.upc, "555");
    assert_eq!(created.profile, Profile::Child);
    assert_eq!(created.status, RecallStatus::Recalled);
    assert_eq!(app.store.item_count(), 1);
    Ok(())
}

#[tokio::test]
async fn created_subscription_is_appended() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    app.store.add_subscription(subscription("cpsc", "Kettle"));
    let mut subs = CollectionSync::<Subscriptions>::new(client);
    subs.load().await?;

    subs.create(&subscription("nhtsa", "Car seat")).await?;

    let queries: Vec<_> =
        subs.items().iter().map(|s| s.product_query.as_str()).collect();
    assert_eq!(queries, ["Kettle", "Car seat"]);
    // appended from the POST response, no second list call
    let lists = app
        .store
        .requests_to("/api/subscriptions/")
        .into_iter()
        .filter(|r| r.method == "GET")
        .count();
    assert_eq!(lists, 1);
    Ok(())
}

#[tokio::test]
async fn failed_create_leaves_collection_unchanged() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    app.store.add_subscription(subscription("cpsc", "Kettle"));
    let mut subs = CollectionSync::<Subscriptions>::new(client);
    subs.load().await?;
    let before = subs.collection().clone();

    app.store.fail_next("POST", "/api/subscriptions/", 500);
    assert!(subs.create(&subscription("fda", "Crackers")).await.is_err());

    assert_eq!(subs.collection(), &before);
    Ok(())
}

#[tokio::test]
async fn drafts_are_trimmed_before_sending() -> anyhow::Result<()> {
    let (app, client) = signed_in().await;
    let mut subs = CollectionSync::<Subscriptions>::new(client.clone());
    subs.load().await?;
    subs.create(&subscription(" fda ", "  Crackers  ")).await?;

    let stored = &app.store.subscriptions()[0];
    assert_eq!(stored.recall_source, "fda");
    assert_eq!(stored.product_query, "Crackers");

    let mut items = CollectionSync::<TrackedItems>::new(client);
    items
        .create(&requests::NewTrackedItem {
            upc: "777".into(),
            label: Some("   ".into()),
            profile: Profile::Other,
        })
        .await?;
    assert_eq!(items.items()[0].label, None);
    Ok(())
}
