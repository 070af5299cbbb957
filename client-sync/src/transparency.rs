use payloads::APIClient;

/// Service status shown on the transparency page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransparencyReport {
    /// `None` until the health check answered.
    pub healthy: Option<bool>,
    pub average_latency_seconds: Option<f64>,
}

impl TransparencyReport {
    /// Ask `/healthz` and `/latency` together. Either may fail without
    /// affecting the other.
    pub async fn fetch(client: &APIClient) -> Self {
        let (health, latency) =
            futures::join!(client.health(), client.latency());

        let healthy = match health {
            Ok(status) => Some(status.is_ok()),
            Err(e) => {
                tracing::warn!("health check failed: {e}");
                Some(false)
            }
        };
        let average_latency_seconds = match latency {
            Ok(report) => report.average_latency_seconds,
            Err(e) => {
                tracing::warn!("latency report failed: {e}");
                None
            }
        };

        Self {
            healthy,
            average_latency_seconds,
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self.healthy {
            None => "...",
            Some(true) => "All systems operational",
            Some(false) => "Service degraded",
        }
    }

    /// Average ingest latency in hours, one decimal.
    pub fn latency_text(&self) -> String {
        match self.average_latency_seconds {
            Some(seconds) => format!("{:.1}h", seconds / 3600.0),
            None => "...".to_string(),
        }
    }
}
