//! In-memory state behind the mock API.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use jiff::Timestamp;
use payloads::{
    NotificationPreferences, Profile, RecallDetail, RecallKey, RecallRecord,
    RecallStatus, RemedyUpdate, Subscription, SubscriptionId, TrackedItem,
    TrackedItemId, requests,
    responses::{CheckResult, UserPreferences},
};

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// How `/api/auth/login` answers for unknown credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginRefusal {
    /// `200 {"ok": false}`
    #[default]
    OkFalse,
    /// `401` with an explanatory body
    Unauthorized,
}

#[derive(Debug, Clone)]
struct StoredItem {
    id: TrackedItemId,
    upc: String,
    label: Option<String>,
    profile: Profile,
}

#[derive(Debug, Clone)]
struct Failure {
    method: String,
    path: String,
    status: u16,
}

#[derive(Debug, Default)]
struct Inner {
    recalls: Vec<RecallRecord>,
    remedy_updates: HashMap<RecallKey, Vec<RemedyUpdate>>,
    recalled_codes: HashMap<String, CheckResult>,
    /// Recalled codes that belong to a seeded recall.
    code_recalls: HashMap<String, RecallKey>,
    subscriptions: Vec<Subscription>,
    items: Vec<StoredItem>,
    next_id: i64,
    users: HashMap<String, String>,
    tokens: Vec<String>,
    login_refusal: LoginRefusal,
    healthy: bool,
    average_latency_seconds: Option<f64>,
    failures: VecDeque<Failure>,
    requests: Vec<RecordedRequest>,
    checkouts: u32,
    preferences: NotificationPreferences,
    preferences_updated_at: Timestamp,
}

/// The mock has a single account owning every token.
const USER_ID: i64 = 1;

/// Shared handle to the mock's data. Tests keep a clone to seed data,
/// inject failures and inspect what the client sent.
#[derive(Debug, Clone)]
pub struct MockStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        let inner = Inner {
            next_id: 1,
            healthy: true,
            preferences_updated_at: Timestamp::now(),
            ..Inner::default()
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("mock store poisoned")
    }

    // === Seeding ===

    pub fn add_recall(&self, record: RecallRecord) {
        self.lock().recalls.push(record);
    }

    /// Make `/api/check/{code}` and tracked items with this UPC report a
    /// recall.
    pub fn mark_recalled(&self, code: &str, url: &str, product: &str) {
        let mut inner = self.lock();
        let recall_id = inner.next_id;
        inner.next_id += 1;
        inner.recalled_codes.insert(
            code.to_string(),
            CheckResult {
                status: RecallStatus::Recalled,
                recall_id: Some(recall_id),
                product_name: Some(product.to_string()),
                hazard: None,
                url: Some(url.to_string()),
            },
        );
    }

    /// Append to a recall's remedy history.
    pub fn add_remedy_update(&self, key: &RecallKey, time: &str, text: &str) {
        self.lock()
            .remedy_updates
            .entry(key.clone())
            .or_default()
            .push(RemedyUpdate {
                time: time.to_string(),
                text: text.to_string(),
            });
    }

    /// Make `code` report `record` as its recall, so tracked items with
    /// this UPC count its remedy updates.
    pub fn link_code_to_recall(&self, code: &str, record: &RecallRecord) {
        let mut inner = self.lock();
        inner.recalled_codes.insert(
            code.to_string(),
            CheckResult {
                status: RecallStatus::Recalled,
                recall_id: Some(record.id),
                product_name: Some(record.product.clone()),
                hazard: Some(record.hazard.clone()),
                url: record.url.clone(),
            },
        );
        inner.code_recalls.insert(code.to_string(), record.key());
    }

    pub fn add_user(&self, email: &str, password: &str) {
        self.lock()
            .users
            .insert(email.to_string(), password.to_string());
    }

    /// Accept `token` as a valid bearer token without a login.
    pub fn issue_token(&self, token: &str) {
        self.lock().tokens.push(token.to_string());
    }

    pub fn set_login_refusal(&self, refusal: LoginRefusal) {
        self.lock().login_refusal = refusal;
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.lock().healthy = healthy;
    }

    pub fn set_average_latency(&self, seconds: Option<f64>) {
        self.lock().average_latency_seconds = seconds;
    }

    /// Answer the next `method` request to exactly `path` with `status`.
    pub fn fail_next(&self, method: &str, path: &str, status: u16) {
        self.lock().failures.push_back(Failure {
            method: method.to_uppercase(),
            path: path.to_string(),
            status,
        });
    }

    // === Inspection ===

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.lock().subscriptions.clone()
    }

    pub fn item_count(&self) -> usize {
        self.lock().items.len()
    }

    // === Used by the routes ===

    pub(crate) fn record(&self, request: RecordedRequest) {
        self.lock().requests.push(request);
    }

    pub(crate) fn take_failure(&self, method: &str, path: &str) -> Option<u16> {
        let mut inner = self.lock();
        let index = inner
            .failures
            .iter()
            .position(|f| f.method == method && f.path == path)?;
        inner.failures.remove(index).map(|f| f.status)
    }

    pub(crate) fn token_is_valid(&self, token: &str) -> bool {
        self.lock().tokens.iter().any(|t| t == token)
    }

    pub(crate) fn login(&self, email: &str, password: &str) -> Option<String> {
        let mut inner = self.lock();
        if inner.users.get(email).map(String::as_str) != Some(password) {
            return None;
        }
        let token = format!("token-{}-{}", email, inner.tokens.len() + 1);
        inner.tokens.push(token.clone());
        Some(token)
    }

    pub(crate) fn login_refusal(&self) -> LoginRefusal {
        self.lock().login_refusal
    }

    /// Newest first.
    pub(crate) fn recent_recalls(&self, limit: usize) -> Vec<RecallRecord> {
        let mut recalls = self.lock().recalls.clone();
        recalls.sort_by(|a, b| b.recall_date.cmp(&a.recall_date));
        recalls.truncate(limit);
        recalls
    }

    pub(crate) fn search_recalls(&self, query: &str) -> Vec<RecallRecord> {
        let query = query.to_lowercase();
        self.lock()
            .recalls
            .iter()
            .filter(|r| {
                r.product.to_lowercase().contains(&query)
                    || r.hazard.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    pub(crate) fn recall_detail(
        &self,
        source: &str,
        id: i64,
    ) -> Option<RecallDetail> {
        let inner = self.lock();
        let record = inner
            .recalls
            .iter()
            .find(|r| r.id == id && r.source == source)?
            .clone();
        let remedy_updates = inner
            .remedy_updates
            .get(&record.key())
            .cloned()
            .unwrap_or_default();
        Some(RecallDetail {
            record,
            remedy_updates,
        })
    }

    pub(crate) fn check(&self, code: &str) -> CheckResult {
        self.lock()
            .recalled_codes
            .get(code)
            .cloned()
            .unwrap_or(CheckResult {
                status: RecallStatus::Safe,
                recall_id: None,
                product_name: None,
                hazard: None,
                url: None,
            })
    }

    pub fn add_subscription(
        &self,
        details: requests::NewSubscription,
    ) -> Subscription {
        let mut inner = self.lock();
        let subscription = Subscription {
            id: SubscriptionId(inner.next_id),
            recall_source: details.recall_source,
            product_query: details.product_query,
        };
        inner.next_id += 1;
        inner.subscriptions.push(subscription.clone());
        subscription
    }

    pub(crate) fn delete_subscription(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.subscriptions.len();
        inner.subscriptions.retain(|s| s.id != id);
        inner.subscriptions.len() != before
    }

    pub(crate) fn items(&self) -> Vec<TrackedItem> {
        let inner = self.lock();
        inner
            .items
            .iter()
            .map(|item| {
                let recalled = inner.recalled_codes.contains_key(&item.upc);
                let update_count = inner
                    .code_recalls
                    .get(&item.upc)
                    .and_then(|key| inner.remedy_updates.get(key))
                    .map_or(0, |updates| updates.len() as u32);
                TrackedItem {
                    id: item.id,
                    upc: item.upc.clone(),
                    label: item.label.clone(),
                    profile: item.profile,
                    status: if recalled {
                        RecallStatus::Recalled
                    } else {
                        RecallStatus::Safe
                    },
                    update_count: recalled.then_some(update_count),
                }
            })
            .collect()
    }

    pub fn add_item(
        &self,
        details: requests::NewTrackedItem,
    ) -> TrackedItemId {
        let mut inner = self.lock();
        let id = TrackedItemId(inner.next_id);
        inner.next_id += 1;
        inner.items.push(StoredItem {
            id,
            upc: details.upc,
            label: details.label,
            profile: details.profile,
        });
        id
    }

    pub(crate) fn delete_item(&self, id: TrackedItemId) -> bool {
        let mut inner = self.lock();
        let before = inner.items.len();
        inner.items.retain(|i| i.id != id);
        inner.items.len() != before
    }

    pub(crate) fn checkout_url(&self, plan: requests::Plan) -> String {
        let mut inner = self.lock();
        inner.checkouts += 1;
        let plan = match plan {
            requests::Plan::Pro => "pro",
        };
        format!(
            "https://checkout.example.com/session/{}?plan={plan}",
            inner.checkouts
        )
    }

    /// Only users who went through checkout have a billing account.
    pub(crate) fn portal_url(&self) -> Option<String> {
        let checkouts = self.lock().checkouts;
        (checkouts > 0).then(|| {
            format!("https://billing.example.com/portal/{checkouts}")
        })
    }

    pub(crate) fn preferences(&self) -> UserPreferences {
        let inner = self.lock();
        UserPreferences {
            id: USER_ID,
            updated_at: inner.preferences_updated_at,
            preferences: inner.preferences.clone(),
        }
    }

    pub(crate) fn replace_preferences(
        &self,
        preferences: NotificationPreferences,
    ) -> UserPreferences {
        {
            let mut inner = self.lock();
            inner.preferences = preferences;
            inner.preferences_updated_at = Timestamp::now();
        }
        self.preferences()
    }

    pub(crate) fn health(&self) -> bool {
        self.lock().healthy
    }

    pub(crate) fn average_latency(&self) -> Option<f64> {
        self.lock().average_latency_seconds
    }
}
