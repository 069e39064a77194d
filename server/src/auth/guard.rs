use actix_web::{HttpRequest, HttpResponse, ResponseError};

use super::bearer::extract_bearer_token;
use crate::{error::AppError, session::SessionStore};

/// Admission check for admin mutations.
///
/// Returns `None` when the request carries a live bearer token, otherwise the
/// 401 response the caller must hand back unchanged.
pub fn require_auth(req: &HttpRequest, sessions: &SessionStore) -> Option<HttpResponse> {
    let Some(token) = extract_bearer_token(req.headers()) else {
        log::debug!("Rejected {} {}: no bearer token", req.method(), req.path());
        return Some(AppError::Unauthorized.error_response());
    };

    if !sessions.validate(token) {
        log::debug!(
            "Rejected {} {}: invalid or expired session",
            req.method(),
            req.path()
        );
        return Some(AppError::Unauthorized.error_response());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    #[actix_web::test]
    async fn test_missing_token_is_rejected() {
        let sessions = SessionStore::new();
        let req = test::TestRequest::get().uri("/api/data").to_http_request();

        let rejection = require_auth(&req, &sessions).expect("should reject");
        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_token_passes() {
        let sessions = SessionStore::new();
        let token = sessions.create();
        let req = test::TestRequest::get()
            .uri("/api/data")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        assert!(require_auth(&req, &sessions).is_none());
    }
}
