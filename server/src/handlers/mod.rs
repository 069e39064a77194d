pub mod auth;
pub mod events;
pub mod health;

use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use futures_util::StreamExt;

use crate::{auth::AdminCredential, db::EventRepository, error::AppError, session::SessionStore};

pub use auth::handle_auth_routes;
pub use events::handle_event_routes;
pub use health::health_check;

/// Largest request body the API reads.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Entry point for everything under `/api`: auth routes first, then events.
///
/// Oversized or unreadable bodies reach the route handlers as empty bodies.
pub async fn api_router(
    req: HttpRequest,
    payload: web::Payload,
    sessions: web::Data<SessionStore>,
    admin: web::Data<AdminCredential>,
    events: web::Data<dyn EventRepository>,
) -> HttpResponse {
    let body = match read_body(payload, MAX_BODY_BYTES).await {
        Some(body) => body,
        None => {
            log::warn!(
                "Discarded unreadable or oversized body on {} {}",
                req.method(),
                req.path()
            );
            web::BytesMut::new()
        }
    };

    handle_auth_routes(&req, &body, &sessions, &admin)
        .or_else(|| handle_event_routes(&req, &body, &sessions, events.get_ref()))
        .unwrap_or_else(|| not_found_response(&req))
}

/// Collects the payload, giving up with `None` past `limit` bytes or on a
/// stream error.
async fn read_body(mut payload: web::Payload, limit: usize) -> Option<web::BytesMut> {
    let mut body = web::BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.ok()?;
        if body.len() + chunk.len() > limit {
            return None;
        }
        body.extend_from_slice(&chunk);
    }

    Some(body)
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    not_found_response(&req)
}

fn not_found_response(req: &HttpRequest) -> HttpResponse {
    log::debug!("No route for {} {}", req.method(), req.path());
    AppError::NotFound.error_response()
}

/// Registers the health check and the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(web::scope("/api").default_service(web::to(api_router)));
}
