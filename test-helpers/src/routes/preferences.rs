use actix_web::{HttpRequest, HttpResponse, web};
use payloads::NotificationPreferences;

use crate::store::MockStore;

use super::{APIError, injected, require_token};

#[tracing::instrument(skip(req, store))]
#[actix_web::get("/preferences")]
pub async fn get(
    req: HttpRequest,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    Ok(HttpResponse::Ok().json(store.preferences()))
}

#[tracing::instrument(skip(req, preferences, store))]
#[actix_web::put("/preferences")]
pub async fn replace(
    req: HttpRequest,
    preferences: web::Json<NotificationPreferences>,
    store: web::Data<MockStore>,
) -> Result<HttpResponse, APIError> {
    injected(&req, &store)?;
    require_token(&req, &store)?;
    if preferences.digest_hour_utc.is_some_and(|hour| hour > 23) {
        return Err(APIError::BadRequest(
            "digest_hour_utc must be between 0 and 23".into(),
        ));
    }
    Ok(HttpResponse::Ok().json(store.replace_preferences(preferences.into_inner())))
}
