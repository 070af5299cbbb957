use serde::{Deserialize, Serialize};

use crate::{NotificationPreferences, RecallStatus, TrackedItemId};

/// Body returned when a tracked item is created. The server only echoes
/// the new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: TrackedItemId,
}

/// Login response. Older deployments answer with `access_token`, newer
/// ones with `token`; some also include an explicit `ok` flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(
        default,
        alias = "access_token",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,
}

/// Result of looking up a scanned barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: RecallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recall_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// `/healthz` body. The server answers 503 with `status: "error"` when its
/// database is down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyReport {
    /// Average delay between a recall being published and ingested.
    pub average_latency_seconds: Option<f64>,
}

/// `/preferences` body: the stored settings plus who owns them and when
/// they last changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub id: i64,
    pub updated_at: jiff::Timestamp,
    #[serde(flatten)]
    pub preferences: NotificationPreferences,
}
