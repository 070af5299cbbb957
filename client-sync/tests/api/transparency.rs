use client_sync::TransparencyReport;
use test_helpers::spawn_app;

#[tokio::test]
async fn healthy_service_reports_latency() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_average_latency(Some(5400.0));

    let report = TransparencyReport::fetch(&app.client).await;

    assert_eq!(report.healthy, Some(true));
    assert_eq!(report.status_text(), "All systems operational");
    assert_eq!(report.latency_text(), "1.5h");
    Ok(())
}

#[tokio::test]
async fn unhealthy_service_is_degraded() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.set_healthy(false);

    let report = TransparencyReport::fetch(&app.client).await;

    assert_eq!(report.healthy, Some(false));
    assert_eq!(report.status_text(), "Service degraded");
    assert_eq!(report.latency_text(), "...");
    Ok(())
}

#[tokio::test]
async fn latency_failure_does_not_hide_health() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.store.fail_next("GET", "/latency", 500);

    let report = TransparencyReport::fetch(&app.client).await;

    assert_eq!(report.healthy, Some(true));
    assert_eq!(report.average_latency_seconds, None);
    Ok(())
}
