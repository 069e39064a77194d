use actix_web::{http::Method, web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::{
    auth::require_auth,
    db::{EventInput, EventRepository},
    error::{AppError, Result},
    session::SessionStore,
};

pub const EVENTS_PATH: &str = "/api/events";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventRoute {
    Collection,
    Item(i64),
}

fn parse_route(path: &str) -> Option<EventRoute> {
    if path == EVENTS_PATH {
        return Some(EventRoute::Collection);
    }

    path.strip_prefix(EVENTS_PATH)
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|id| id.parse().ok())
        .map(EventRoute::Item)
}

/// Public feed plus guarded admin CRUD.
///
/// Mutations pass `require_auth` before the body is read or the repository is
/// touched. Returns `None` for paths and methods outside the events API.
pub fn handle_event_routes(
    req: &HttpRequest,
    body: &[u8],
    sessions: &SessionStore,
    events: &dyn EventRepository,
) -> Option<HttpResponse> {
    let route = parse_route(req.path())?;

    let result = match (req.method(), route) {
        (&Method::GET, EventRoute::Collection) => list_events(req, events),
        (&Method::GET, EventRoute::Item(id)) => get_event(id, events),
        (&Method::POST, EventRoute::Collection) => {
            if let Some(rejection) = require_auth(req, sessions) {
                return Some(rejection);
            }
            create_event(body, events)
        }
        (&Method::PUT, EventRoute::Item(id)) => {
            if let Some(rejection) = require_auth(req, sessions) {
                return Some(rejection);
            }
            update_event(id, body, events)
        }
        (&Method::DELETE, EventRoute::Item(id)) => {
            if let Some(rejection) = require_auth(req, sessions) {
                return Some(rejection);
            }
            delete_event(id, events)
        }
        _ => return None,
    };

    Some(result.unwrap_or_else(|err| err.error_response()))
}

fn list_events(req: &HttpRequest, events: &dyn EventRepository) -> Result<HttpResponse> {
    let include_past = web::Query::<ListQuery>::from_query(req.query_string())
        .map(|query| query.all)
        .unwrap_or(false);

    let list = events.list_events(include_past)?;
    Ok(HttpResponse::Ok().json(list))
}

fn get_event(id: i64, events: &dyn EventRepository) -> Result<HttpResponse> {
    let event = events.get_event(id)?.ok_or(AppError::EventNotFound)?;
    Ok(HttpResponse::Ok().json(event))
}

fn create_event(body: &[u8], events: &dyn EventRepository) -> Result<HttpResponse> {
    let input = parse_input(body)?;
    let event = events.create_event(input)?;
    Ok(HttpResponse::Created().json(event))
}

fn update_event(id: i64, body: &[u8], events: &dyn EventRepository) -> Result<HttpResponse> {
    let input = parse_input(body)?;
    let event = events
        .update_event(id, input)?
        .ok_or(AppError::EventNotFound)?;
    Ok(HttpResponse::Ok().json(event))
}

fn delete_event(id: i64, events: &dyn EventRepository) -> Result<HttpResponse> {
    if !events.delete_event(id)? {
        return Err(AppError::EventNotFound);
    }
    Ok(HttpResponse::Ok().json(DeleteResponse { ok: true }))
}

fn parse_input(body: &[u8]) -> Result<EventInput> {
    let input: EventInput = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidEvent(format!("Invalid event payload: {}", e)))?;
    input.validate()?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route() {
        assert_eq!(parse_route("/api/events"), Some(EventRoute::Collection));
        assert_eq!(parse_route("/api/events/12"), Some(EventRoute::Item(12)));
        assert_eq!(parse_route("/api/events/abc"), None);
        assert_eq!(parse_route("/api/events/"), None);
        assert_eq!(parse_route("/api/eventsx"), None);
        assert_eq!(parse_route("/api/other"), None);
    }
}
