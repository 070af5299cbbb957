use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Deserialize;

use crate::store::MockStore;

use super::{APIError, injected, require_token};

const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[tracing::instrument(skip(req, store))]
#[get("/recalls/recent")]
pub async fn recent(
    req: HttpRequest,
    params: web::Query<RecentParams>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Ok(HttpResponse::Ok().json(store.recent_recalls(limit)))
}

#[tracing::instrument(skip(req, store))]
#[get("/recalls/search")]
pub async fn search(
    req: HttpRequest,
    params: web::Query<SearchParams>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    if params.q.trim().is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<()>::new()));
    }
    Ok(HttpResponse::Ok().json(store.search_recalls(&params.q)))
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    source: String,
}

#[tracing::instrument(skip(req, store))]
#[get("/recall/{id}")]
pub async fn detail(
    req: HttpRequest,
    id: web::Path<i64>,
    params: web::Query<DetailParams>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    let detail = store
        .recall_detail(&params.source, *id)
        .ok_or_else(|| APIError::NotFound(format!("recall {}", *id)))?;
    Ok(HttpResponse::Ok().json(detail))
}

#[tracing::instrument(skip(req, store))]
#[get("/check/{code}")]
pub async fn check_code(
    req: HttpRequest,
    code: web::Path<String>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(APIError::BadRequest("invalid upc".into()));
    }
    Ok(HttpResponse::Ok().json(store.check(&code)))
}
