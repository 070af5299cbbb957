use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use payloads::{SubscriptionId, requests};

use crate::store::MockStore;

use super::{APIError, injected, require_token};

#[tracing::instrument(skip(req, store))]
#[get("/subscriptions/")]
pub async fn list(
    req: HttpRequest,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    Ok(HttpResponse::Ok().json(store.subscriptions()))
}

#[tracing::instrument(skip(req, store))]
#[post("/subscriptions/")]
pub async fn create(
    req: HttpRequest,
    details: web::Json<requests::NewSubscription>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    if details.product_query.trim().is_empty() {
        return Err(APIError::BadRequest("product_query required".into()));
    }
    let subscription = store.add_subscription(details.into_inner());
    Ok(HttpResponse::Created().json(subscription))
}

#[tracing::instrument(skip(req, store))]
#[delete("/subscriptions/{id}")]
pub async fn delete(
    req: HttpRequest,
    id: web::Path<i64>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    if !store.delete_subscription(SubscriptionId(*id)) {
        return Err(APIError::NotFound(format!("subscription {id}")));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}
