pub mod auth;
pub mod items;
pub mod ops;
pub mod preferences;
pub mod recalls;
pub mod subscriptions;

use actix_web::{
    HttpRequest, HttpResponse, ResponseError, body::BoxBody,
    dev::HttpServiceFactory, http::StatusCode, http::header::AUTHORIZATION,
    web,
};

use crate::store::MockStore;

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(recalls::recent)
        .service(recalls::search)
        .service(recalls::detail)
        .service(recalls::check_code)
        .service(subscriptions::list)
        .service(subscriptions::create)
        .service(subscriptions::delete)
        .service(items::list)
        .service(items::create)
        .service(items::delete)
        .service(auth::login)
        .service(auth::checkout)
        .service(auth::portal)
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication failed")]
    AuthError(String),
    #[error("Bad request")]
    BadRequest(String),
    #[error("Not found")]
    NotFound(String),
    #[error("Injected failure")]
    Injected(StatusCode),
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::AuthError(e) => {
                HttpResponse::Unauthorized().body(format!("{self}: {e}"))
            }
            Self::BadRequest(e) => {
                HttpResponse::BadRequest().body(format!("{self}: {e}"))
            }
            Self::NotFound(e) => {
                HttpResponse::NotFound().body(format!("{self}: {e}"))
            }
            Self::Injected(status) => {
                HttpResponse::build(*status).body(self.to_string())
            }
        }
    }
}

/// Fail the request if a test queued a failure for it.
fn injected(req: &HttpRequest, store: &MockStore) -> Result<(), APIError> {
    match store.take_failure(req.method().as_str(), req.path()) {
        Some(status) => {
            let status = StatusCode::from_u16(status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            tracing::debug!(%status, "injecting failure");
            Err(APIError::Injected(status))
        }
        None => Ok(()),
    }
}

/// Require a bearer token the store has issued.
fn require_token(req: &HttpRequest, store: &MockStore) -> Result<(), APIError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| APIError::AuthError("Missing token".into()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| APIError::AuthError("Expected a bearer token".into()))?;
    if !store.token_is_valid(token) {
        return Err(APIError::AuthError("Invalid token".into()));
    }
    Ok(())
}
