use actix_web::{HttpRequest, HttpResponse, get, web};
use payloads::responses;

use crate::store::MockStore;

use super::{APIError, injected};

#[get("/healthz")]
pub async fn healthz(
    req: HttpRequest,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    if store.health() {
        Ok(HttpResponse::Ok().json(responses::HealthStatus {
            status: "ok".into(),
            db: Some("ok".into()),
        }))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(responses::HealthStatus {
            status: "error".into(),
            db: Some("down".into()),
        }))
    }
}

#[get("/latency")]
pub async fn latency(
    req: HttpRequest,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    Ok(HttpResponse::Ok().json(responses::LatencyReport {
        average_latency_seconds: store.average_latency(),
    }))
}
