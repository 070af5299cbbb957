use std::sync::Arc;

use client_sync::preferences::{AlertSource, Channel};
use client_sync::{
    PreferenceChange, SyncError, forms, load_preferences, submit_preferences,
};
use payloads::NotificationPreferences;
use reqwest::StatusCode;
use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn fresh_account_gets_default_preferences() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = app.client_with(Arc::new(app.issue_token("settings")));

    let form = load_preferences(&client).await?;

    assert_eq!(form.current(), &NotificationPreferences::default());
    assert!(!form.is_dirty());
    Ok(())
}

#[tokio::test]
async fn preferences_need_a_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    assert_status_code(app.client.preferences().await, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn saved_edits_survive_a_reload() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = app.client_with(Arc::new(app.issue_token("settings")));
    let mut form = load_preferences(&client).await?;

    form.change(PreferenceChange::ToggleChannel(Channel::Sms));
    form.change(PreferenceChange::ToggleSource(AlertSource::Misc));
    form.change(PreferenceChange::DigestHour(Some(8)));
    assert!(form.is_dirty());

    let sent = form.current().clone();
    let confirmed = submit_preferences(&client, &sent).await?;
    form.mark_saved(&sent, confirmed);
    assert!(!form.is_dirty());

    let reloaded = load_preferences(&client).await?;
    assert_eq!(reloaded.current(), &sent);
    assert!(Channel::Sms.enabled_in(reloaded.current()));
    assert!(!AlertSource::Misc.enabled_in(reloaded.current()));
    assert_eq!(reloaded.current().digest_hour_utc, Some(8));

    let puts: Vec<_> = app
        .store
        .requests_to("/preferences")
        .into_iter()
        .filter(|r| r.method == "PUT")
        .collect();
    assert_eq!(puts.len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_save_keeps_the_edits() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = app.client_with(Arc::new(app.issue_token("settings")));
    let mut form = load_preferences(&client).await?;
    form.change(PreferenceChange::ToggleChannel(Channel::Push));

    app.store.fail_next("PUT", "/preferences", 500);
    assert!(submit_preferences(&client, form.current()).await.is_err());

    assert!(form.is_dirty());
    form.reset();
    assert!(!Channel::Push.enabled_in(form.current()));
    assert_eq!(
        load_preferences(&client).await?.current(),
        &NotificationPreferences::default()
    );
    Ok(())
}

#[tokio::test]
async fn out_of_range_hour_is_not_sent() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = app.client_with(Arc::new(app.issue_token("settings")));
    let mut form = load_preferences(&client).await?;
    form.change(PreferenceChange::DigestHour(Some(30)));

    let result = submit_preferences(&client, form.current()).await;

    assert!(matches!(
        result,
        Err(SyncError::Validation(ref errors)) if errors.get(forms::DIGEST_HOUR).is_some()
    ));
    let puts = app
        .store
        .requests_to("/preferences")
        .into_iter()
        .filter(|r| r.method == "PUT")
        .count();
    assert_eq!(puts, 0);
    Ok(())
}
