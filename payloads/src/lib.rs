//! Wire types shared by every client of the recall API, plus the
//! [`APIClient`] that speaks to it.

pub mod api_client;
pub mod requests;
pub mod responses;

pub use api_client::{
    APIClient, ClientError, RequestOptions, TokenSource, ok_body, ok_empty,
};

use derive_more::Display;
use jiff::civil::Date;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Id type wrapper helps ensure we don't mix up ids for different
/// collections.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct SubscriptionId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct TrackedItemId(pub i64);

/// A single product-safety recall notice from a regulator feed.
///
/// Ids are only unique within a source, so records are identified by
/// [`RecallKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallRecord {
    pub id: i64,
    pub product: String,
    pub hazard: String,
    pub recall_date: Date,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RecallRecord {
    pub fn key(&self) -> RecallKey {
        RecallKey {
            source: self.source.clone(),
            id: self.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{source}-{id}")]
pub struct RecallKey {
    pub source: String,
    pub id: i64,
}

/// One entry in a recall's remedy history, e.g. a new fix or an extended
/// refund window. `time` is whatever the regulator published, usually an
/// ISO date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemedyUpdate {
    pub time: String,
    pub text: String,
}

/// A recall with its remedy history, oldest update first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallDetail {
    #[serde(flatten)]
    pub record: RecallRecord,
    #[serde(default)]
    pub remedy_updates: Vec<RemedyUpdate>,
}

/// A user's standing interest in recalls matching a source/query pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub recall_source: String,
    pub product_query: String,
}

/// Whose product a tracked item is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    #[serde(rename = "self")]
    Myself,
    Child,
    Pet,
    Other,
}

impl Profile {
    /// Display order for grouped lists.
    pub const ALL: [Profile; 4] =
        [Profile::Myself, Profile::Child, Profile::Pet, Profile::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Profile::Myself => "Me",
            Profile::Child => "My Kids",
            Profile::Pet => "My Pets",
            Profile::Other => "Other",
        }
    }

    /// The wire name, also used as a form value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Myself => "self",
            Profile::Child => "child",
            Profile::Pet => "pet",
            Profile::Other => "other",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RecallStatus {
    #[default]
    #[display("safe")]
    Safe,
    #[display("recalled")]
    Recalled,
}

/// A product the user has registered for recall monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub id: TrackedItemId,
    pub upc: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub status: RecallStatus,
    /// Number of remedy updates on the matching recall, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_count: Option<u32>,
}

impl TrackedItem {
    /// The label if one was given, otherwise the UPC.
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.upc)
    }
}

/// Where alerts are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelPrefs {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
}

impl Default for ChannelPrefs {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            push: false,
        }
    }
}

/// Which regulator feeds produce alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePrefs {
    pub cpsc: bool,
    pub fda: bool,
    pub usda: bool,
    pub nhtsa: bool,
    pub misc: bool,
}

impl Default for SourcePrefs {
    fn default() -> Self {
        Self {
            cpsc: true,
            fda: true,
            usda: true,
            nhtsa: true,
            misc: true,
        }
    }
}

/// A user's notification settings, replaced as a whole on save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default)]
    pub channels: ChannelPrefs,
    #[serde(default)]
    pub sources: SourcePrefs,
    /// Hour of day (UTC) for the daily digest; `None` sends alerts
    /// immediately.
    #[serde(default)]
    pub digest_hour_utc: Option<u8>,
}

/// Opaque credential sent on authenticated requests.
///
/// The inner value is only reachable through [`BearerToken::expose`] so it
/// does not end up in logs or debug output.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Value for an `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

impl PartialEq for BearerToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for BearerToken {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_uses_wire_names() {
        let json = serde_json::to_string(&Profile::Myself).unwrap();
        assert_eq!(json, r#""self""#);
        let pet: Profile = serde_json::from_str(r#""pet""#).unwrap();
        assert_eq!(pet, Profile::Pet);
        assert_eq!(Profile::from_wire("child"), Some(Profile::Child));
        assert_eq!(Profile::from_wire("robot"), None);
    }

    #[test]
    fn tracked_item_defaults_missing_fields() {
        let item: TrackedItem =
            serde_json::from_str(r#"{"id": 4, "upc": "0123"}"#).unwrap();
        assert_eq!(item.profile, Profile::Myself);
        assert_eq!(item.status, RecallStatus::Safe);
        assert_eq!(item.display_name(), "0123");
    }

    #[test]
    fn recall_key_combines_source_and_id() {
        let record: RecallRecord = serde_json::from_str(
            r#"{"id": 7, "product": "Kettle", "hazard": "Fire",
                "recall_date": "2024-05-01", "source": "cpsc"}"#,
        )
        .unwrap();
        assert_eq!(record.key().to_string(), "cpsc-7");
        assert_eq!(record.url, None);
    }

    #[test]
    fn recall_detail_flattens_the_record() {
        let detail: RecallDetail = serde_json::from_str(
            r#"{"id": 3, "product": "Widget", "hazard": "Fire",
                "recall_date": "2024-01-01", "source": "cpsc",
                "remedy_updates": [
                    {"time": "2024-01-01", "text": "Initial"},
                    {"time": "2024-02-01", "text": "Follow-up"}
                ]}"#,
        )
        .unwrap();
        assert_eq!(detail.record.product, "Widget");
        assert_eq!(detail.remedy_updates.len(), 2);
        assert_eq!(detail.remedy_updates[1].text, "Follow-up");
    }

    #[test]
    fn preferences_fill_in_defaults() {
        let prefs: NotificationPreferences =
            serde_json::from_str(r#"{"channels": {"sms": true}}"#).unwrap();
        assert!(prefs.channels.email);
        assert!(prefs.channels.sms);
        assert_eq!(prefs.sources, SourcePrefs::default());
        assert_eq!(prefs.digest_hour_utc, None);
    }

    #[test]
    fn bearer_token_is_redacted_in_debug() {
        let token = BearerToken::new("hunter2");
        assert!(!format!("{token:?}").contains("hunter2"));
        assert_eq!(token.header_value(), "Bearer hunter2");
    }
}
