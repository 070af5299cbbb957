use actix_web::{HttpRequest, HttpResponse, post, web};
use payloads::{requests, responses};
use serde::Deserialize;

use crate::store::{LoginRefusal, MockStore};

use super::{APIError, injected, require_token};

#[derive(Deserialize)]
pub struct Credentials {
    email: String,
    password: String,
}

#[tracing::instrument(
    skip(req, credentials, store),
    fields(email = %credentials.email)
)]
#[post("/auth/login")]
pub async fn login(
    req: HttpRequest,
    credentials: web::Json<Credentials>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    if let Some(token) = store.login(&credentials.email, &credentials.password)
    {
        return Ok(HttpResponse::Ok().json(responses::LoginResponse {
            ok: Some(true),
            token: Some(token),
        }));
    }
    match store.login_refusal() {
        LoginRefusal::OkFalse => {
            Ok(HttpResponse::Ok().json(responses::LoginResponse {
                ok: Some(false),
                token: None,
            }))
        }
        LoginRefusal::Unauthorized => Err(APIError::AuthError(
            "Invalid credentials for this account".into(),
        )),
    }
}

#[tracing::instrument(skip(req, store))]
#[post("/billing/checkout")]
pub async fn checkout(
    req: HttpRequest,
    details: web::Json<requests::Checkout>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    let url = store.checkout_url(details.plan);
    Ok(HttpResponse::Ok().json(responses::CheckoutSession { url }))
}

#[tracing::instrument(skip(req, store))]
#[post("/billing/portal")]
pub async fn portal(
    req: HttpRequest,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    let url = store
        .portal_url()
        .ok_or_else(|| APIError::NotFound("no billing account".into()))?;
    Ok(HttpResponse::Ok().json(responses::CheckoutSession { url }))
}
