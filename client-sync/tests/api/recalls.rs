use std::sync::Arc;

use client_sync::recalls::{format_update_time, load_detail};
use client_sync::{CollectionSync, FetchState, RecallFeed, SyncError, TrackedItems};
use payloads::{ClientError, Profile, RecallKey, requests};
use reqwest::StatusCode;
use test_helpers::{mock::sample_recalls, spawn_app};

#[tokio::test]
async fn recent_feed_is_newest_first() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_recalls(sample_recalls());
    let mut feed = RecallFeed::new(app.client.clone());

    feed.load_recent(Some(3)).await?;

    let products: Vec<_> = feed
        .recalls()
        .items()
        .iter()
        .map(|r| r.product.as_str())
        .collect();
    assert_eq!(
        products,
        ["Dog Food Kibble", "Folding Stroller", "Electric Kettle"]
    );
    Ok(())
}

#[tokio::test]
async fn records_from_different_sources_keep_their_ids() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    app.seed_recalls(sample_recalls());
    let mut feed = RecallFeed::new(app.client.clone());

    feed.load_recent(None).await?;

    let recalls = feed.recalls();
    assert_eq!(recalls.len(), sample_recalls().len());
    let sources_with_id_1 = recalls
        .items()
        .iter()
        .filter(|r| r.id == 1)
        .count();
    assert_eq!(sources_with_id_1, 3);
    Ok(())
}

#[tokio::test]
async fn search_matches_product_and_hazard() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_recalls(sample_recalls());
    let mut feed = RecallFeed::new(app.client.clone());

    feed.search("fire").await?;

    let mut products: Vec<_> = feed
        .recalls()
        .items()
        .iter()
        .map(|r| r.product.clone())
        .collect();
    products.sort();
    assert_eq!(products, ["Electric Kettle", "Space Heater"]);
    assert_eq!(app.store.requests_to("/api/recalls/search").len(), 1);
    Ok(())
}

#[tokio::test]
async fn search_without_hits_is_empty() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_recalls(sample_recalls());
    let mut feed = RecallFeed::new(app.client.clone());

    feed.search("trampoline").await?;

    assert_eq!(feed.recalls().state(), &FetchState::Empty);
    Ok(())
}

#[tokio::test]
async fn blank_search_sends_nothing() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let mut feed = RecallFeed::new(app.client.clone());

    feed.search("   ").await?;

    assert_eq!(feed.recalls().state(), &FetchState::Empty);
    assert!(app.store.requests_to("/api/recalls/search").is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_feed_is_an_error_state() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.fail_next("GET", "/api/recalls/recent", 500);
    let mut feed = RecallFeed::new(app.client.clone());

    assert!(feed.load_recent(None).await.is_err());
    assert!(feed.recalls().state().error().is_some());
    Ok(())
}

#[tokio::test]
async fn detail_carries_the_remedy_timeline_in_order() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_recalls(sample_recalls());
    let stroller = sample_recalls()[1].key();
    app.store.add_remedy_update(&stroller, "2025-04-18", "Initial");
    app.store.add_remedy_update(&stroller, "2025-05-02", "Follow-up");
    let client = app.client_with(Arc::new(app.issue_token("reader")));

    let detail = load_detail(&client, &stroller).await?;

    assert_eq!(detail.record.product, "Folding Stroller");
    let timeline: Vec<_> = detail
        .remedy_updates
        .iter()
        .map(|u| (format_update_time(&u.time), u.text.as_str()))
        .collect();
    assert_eq!(
        timeline,
        [
            ("April 18, 2025".to_string(), "Initial"),
            ("May 02, 2025".to_string(), "Follow-up"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn detail_is_looked_up_by_source_and_id() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_recalls(sample_recalls());
    let client = app.client_with(Arc::new(app.issue_token("reader")));

    let key = RecallKey {
        source: "nhtsa".into(),
        id: 1,
    };
    let detail = load_detail(&client, &key).await?;
    assert_eq!(detail.record.product, "Child Car Seat");
    assert!(detail.remedy_updates.is_empty());

    let missing = RecallKey {
        source: "usda".into(),
        id: 1,
    };
    assert!(matches!(
        load_detail(&client, &missing).await,
        Err(SyncError::Client(ClientError::APIError(StatusCode::NOT_FOUND, _)))
    ));
    Ok(())
}

#[tokio::test]
async fn detail_needs_a_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_recalls(sample_recalls());

    let result = load_detail(&app.client, &sample_recalls()[0].key()).await;

    assert!(matches!(
        result,
        Err(SyncError::Client(ClientError::APIError(
            StatusCode::UNAUTHORIZED,
            _
        )))
    ));
    Ok(())
}

#[tokio::test]
async fn tracked_item_counts_remedy_updates() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let kettle = sample_recalls()[0].clone();
    app.seed_recalls([kettle.clone()]);
    app.store.link_code_to_recall("012345678905", &kettle);
    app.store.add_remedy_update(&kettle.key(), "2025-03-04", "Announced");
    app.store.add_remedy_update(&kettle.key(), "2025-04-10", "Bases shipping");
    app.store.add_item(requests::NewTrackedItem {
        upc: "012345678905".into(),
        label: None,
        profile: Profile::Myself,
    });
    let client = app.client_with(Arc::new(app.issue_token("owner")));

    let mut items = CollectionSync::<TrackedItems>::new(client);
    items.load().await?;

    assert_eq!(items.items()[0].update_count, Some(2));
    Ok(())
}
