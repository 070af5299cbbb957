use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use payloads::{TrackedItemId, requests, responses};

use crate::store::MockStore;

use super::{APIError, injected, require_token};

#[tracing::instrument(skip(req, store))]
#[get("/items")]
pub async fn list(
    req: HttpRequest,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    Ok(HttpResponse::Ok().json(store.items()))
}

/// Answers with the new id only, like the real service.
#[tracing::instrument(skip(req, store))]
#[post("/items")]
pub async fn create(
    req: HttpRequest,
    details: web::Json<requests::NewTrackedItem>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    if details.upc.is_empty() {
        return Err(APIError::BadRequest("upc required".into()));
    }
    let id = store.add_item(details.into_inner());
    Ok(HttpResponse::Created().json(responses::Created { id }))
}

#[tracing::instrument(skip(req, store))]
#[delete("/items/{id}")]
pub async fn delete(
    req: HttpRequest,
    id: web::Path<i64>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    if !store.delete_item(TrackedItemId(*id)) {
        return Err(APIError::NotFound(format!("item {id}")));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}
