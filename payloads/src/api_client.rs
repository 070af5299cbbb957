use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;

use crate::{
    BearerToken, NotificationPreferences, RecallDetail, RecallKey,
    RecallRecord, Subscription, SubscriptionId, TrackedItem, TrackedItemId,
    requests, responses,
};

/// Anything that can hand out the current bearer token.
///
/// The client asks on every request, so a token set or cleared after the
/// client was built is picked up by the next call.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<BearerToken>;
}

impl TokenSource for BearerToken {
    fn bearer_token(&self) -> Option<BearerToken> {
        Some(self.clone())
    }
}

/// Options for a raw request through [`APIClient::request`].
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn post(body: &impl Serialize) -> Result<Self, ClientError> {
        Ok(Self {
            method: Method::POST,
            body: Some(
                serde_json::to_value(body)
                    .map_err(|e| ClientError::Encode(e.to_string()))?,
            ),
            ..Self::default()
        })
    }

    pub fn put(body: &impl Serialize) -> Result<Self, ClientError> {
        Ok(Self {
            method: Method::PUT,
            ..Self::post(body)?
        })
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// An API client for interfacing with the recall backend.
#[derive(Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    /// Where the bearer token comes from. `None` sends every request
    /// anonymously.
    pub tokens: Option<Arc<dyn TokenSource>>,
}

impl APIClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
            tokens: None,
        }
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    fn current_token(&self) -> Option<BearerToken> {
        self.tokens.as_ref().and_then(|t| t.bearer_token())
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}{path}", self.address.trim_end_matches('/'))
    }

    /// Send a request, attaching `Authorization: Bearer <token>` when a
    /// token is held.
    ///
    /// Headers supplied by the caller are kept as they are; an explicit
    /// `Authorization` header from the caller wins over the stored token.
    /// A non-2xx status is not an error here: the response is handed back
    /// for the caller to inspect. Only transport failures are errors.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(self.format_url(path), options).await
    }

    async fn send(
        &self,
        url: impl reqwest::IntoUrl,
        options: RequestOptions,
    ) -> Result<reqwest::Response, ClientError> {
        let RequestOptions {
            method,
            mut headers,
            query,
            body,
        } = options;

        if !headers.contains_key(AUTHORIZATION) {
            if let Some(token) = self.current_token() {
                match HeaderValue::from_str(&token.header_value()) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        headers.insert(AUTHORIZATION, value);
                    }
                    Err(_) => tracing::warn!(
                        "stored token is not a valid header value, \
                         sending request without it"
                    ),
                }
            }
        }

        let mut request = self.inner_client.request(method, url).headers(headers);
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        Ok(request.send().await?)
    }

    async fn empty_get(
        &self,
        path: &str,
    ) -> Result<reqwest::Response, ClientError> {
        self.request(path, RequestOptions::get()).await
    }

    async fn post(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<reqwest::Response, ClientError> {
        self.request(path, RequestOptions::post(body)?).await
    }

    async fn delete(
        &self,
        path: &str,
    ) -> Result<reqwest::Response, ClientError> {
        self.request(path, RequestOptions::delete()).await
    }
}

/// Methods on the backend API
impl APIClient {
    /// Most recent recalls across all sources, newest first.
    pub async fn recent_recalls(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<RecallRecord>, ClientError> {
        let mut options = RequestOptions::get();
        if let Some(limit) = limit {
            options = options.query("limit", limit);
        }
        let response = self.request("/api/recalls/recent", options).await?;
        ok_body(response).await
    }

    pub async fn search_recalls(
        &self,
        query: &str,
    ) -> Result<Vec<RecallRecord>, ClientError> {
        let options = RequestOptions::get().query("q", query);
        let response = self.request("/api/recalls/search", options).await?;
        ok_body(response).await
    }

    /// One recall with its remedy history.
    pub async fn recall_detail(
        &self,
        key: &RecallKey,
    ) -> Result<RecallDetail, ClientError> {
        let options = RequestOptions::get().query("source", &key.source);
        let response = self
            .request(&format!("/api/recall/{}", key.id), options)
            .await?;
        ok_body(response).await
    }

    pub async fn list_subscriptions(
        &self,
    ) -> Result<Vec<Subscription>, ClientError> {
        let response = self.empty_get("/api/subscriptions/").await?;
        ok_body(response).await
    }

    pub async fn create_subscription(
        &self,
        details: &requests::NewSubscription,
    ) -> Result<Subscription, ClientError> {
        let response = self.post("/api/subscriptions/", details).await?;
        ok_body(response).await
    }

    pub async fn delete_subscription(
        &self,
        id: &SubscriptionId,
    ) -> Result<(), ClientError> {
        let response =
            self.delete(&format!("/api/subscriptions/{id}")).await?;
        ok_empty(response).await
    }

    pub async fn list_items(&self) -> Result<Vec<TrackedItem>, ClientError> {
        let response = self.empty_get("/api/items").await?;
        ok_body(response).await
    }

    /// Register a product. The server only returns the new id; callers
    /// wanting the full item (with its recall status) refetch the list.
    pub async fn create_item(
        &self,
        details: &requests::NewTrackedItem,
    ) -> Result<responses::Created, ClientError> {
        let response = self.post("/api/items", details).await?;
        ok_body(response).await
    }

    pub async fn delete_item(
        &self,
        id: &TrackedItemId,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("/api/items/{id}")).await?;
        ok_empty(response).await
    }

    /// Look up a scanned barcode. The code is sent as a single encoded
    /// path segment.
    pub async fn check_code(
        &self,
        code: &str,
    ) -> Result<responses::CheckResult, ClientError> {
        let mut url = Url::parse(&self.format_url("/api/check"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidUrl(format!(
                    "{} cannot take path segments",
                    self.address
                ))
            })?
            .push(code);
        let response = self.send(url, RequestOptions::get()).await?;
        ok_body(response).await
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Every refusal, whatever the server said, becomes
    /// [`ClientError::InvalidCredentials`].
    pub async fn login(
        &self,
        credentials: &requests::LoginCredentials,
    ) -> Result<BearerToken, ClientError> {
        let response = self.post("/api/auth/login", credentials).await?;
        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "login refused");
            return Err(ClientError::InvalidCredentials);
        }

        let body = match response.json::<responses::LoginResponse>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("unreadable login response: {e}");
                return Err(ClientError::InvalidCredentials);
            }
        };

        match body {
            responses::LoginResponse {
                ok: Some(false), ..
            } => Err(ClientError::InvalidCredentials),
            responses::LoginResponse {
                token: Some(token), ..
            } if !token.is_empty() => Ok(BearerToken::new(token)),
            _ => Err(ClientError::InvalidCredentials),
        }
    }

    /// Start a billing checkout, returning the page to redirect to.
    pub async fn checkout(
        &self,
        plan: requests::Plan,
    ) -> Result<responses::CheckoutSession, ClientError> {
        let response = self
            .post("/api/billing/checkout", &requests::Checkout { plan })
            .await?;
        ok_body(response).await
    }

    /// Open the hosted subscription management page, returning the page to
    /// redirect to. Answers 404 for users who never checked out.
    pub async fn billing_portal(
        &self,
    ) -> Result<responses::CheckoutSession, ClientError> {
        let options = RequestOptions {
            method: Method::POST,
            ..RequestOptions::default()
        };
        let response = self.request("/api/billing/portal", options).await?;
        ok_body(response).await
    }

    pub async fn preferences(
        &self,
    ) -> Result<responses::UserPreferences, ClientError> {
        let response = self.empty_get("/preferences").await?;
        ok_body(response).await
    }

    /// Replace the stored preferences, returning them as saved.
    pub async fn replace_preferences(
        &self,
        preferences: &NotificationPreferences,
    ) -> Result<responses::UserPreferences, ClientError> {
        let response = self
            .request("/preferences", RequestOptions::put(preferences)?)
            .await?;
        ok_body(response).await
    }

    /// Service health. A 503 still carries a status body, which is
    /// returned rather than treated as an error.
    pub async fn health(
        &self,
    ) -> Result<responses::HealthStatus, ClientError> {
        let response = self.empty_get("/healthz").await?;
        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(response.json().await?);
        }
        ok_body(response).await
    }

    pub async fn latency(
        &self,
    ) -> Result<responses::LatencyReport, ClientError> {
        let response = self.empty_get("/latency").await?;
        ok_body(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
    #[error("Could not encode request: {0}")]
    Encode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::APIError(status, _) => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<T>().await?)
}

/// Check that a response is OK, ignoring its body, returning a ClientError
/// if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(())
}
