use actix_web::{http::Method, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{extract_bearer_token, AdminCredential},
    error::AppError,
    session::SessionStore,
};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const ME_PATH: &str = "/api/auth/me";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Serves the login/me/logout endpoints.
///
/// Returns `None` for any method and path it does not own so the caller's
/// router can decide what to answer.
pub fn handle_auth_routes(
    req: &HttpRequest,
    body: &[u8],
    sessions: &SessionStore,
    admin: &AdminCredential,
) -> Option<HttpResponse> {
    match (req.method(), req.path()) {
        (&Method::POST, LOGIN_PATH) => Some(login(body, sessions, admin)),
        (&Method::GET, ME_PATH) => Some(me(req, sessions)),
        (&Method::POST, LOGOUT_PATH) => Some(logout(req, sessions)),
        _ => None,
    }
}

fn login(body: &[u8], sessions: &SessionStore, admin: &AdminCredential) -> HttpResponse {
    // A body that doesn't parse is just another wrong password.
    let accepted = serde_json::from_slice::<LoginRequest>(body)
        .map(|request| admin.verify(&request.password))
        .unwrap_or(false);

    if !accepted {
        log::warn!("Failed admin login attempt");
        return AppError::InvalidPassword.error_response();
    }

    let token = sessions.create();
    log::info!("Successful admin login");

    HttpResponse::Ok().json(LoginResponse { token })
}

fn me(req: &HttpRequest, sessions: &SessionStore) -> HttpResponse {
    let authenticated = extract_bearer_token(req.headers())
        .map(|token| sessions.validate(token))
        .unwrap_or(false);

    HttpResponse::Ok().json(MeResponse { authenticated })
}

fn logout(req: &HttpRequest, sessions: &SessionStore) -> HttpResponse {
    if let Some(token) = extract_bearer_token(req.headers()) {
        sessions.delete(token);
    }

    HttpResponse::Ok().json(LogoutResponse { ok: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode, test};

    async fn json_body(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_login_with_missing_body_is_invalid_password() {
        let sessions = SessionStore::new();
        let admin = AdminCredential::new("secret");
        let req = test::TestRequest::post().uri(LOGIN_PATH).to_http_request();

        let resp = handle_auth_routes(&req, b"", &sessions, &admin).unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["error"], "Invalid password");
        assert_eq!(sessions.active_session_count(), 0);
    }

    #[actix_web::test]
    async fn test_login_with_non_string_password_is_invalid_password() {
        let sessions = SessionStore::new();
        let admin = AdminCredential::new("secret");
        let req = test::TestRequest::post().uri(LOGIN_PATH).to_http_request();

        let resp = handle_auth_routes(&req, br#"{"password": 42}"#, &sessions, &admin).unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_wrong_method_is_not_handled() {
        let sessions = SessionStore::new();
        let admin = AdminCredential::new("secret");

        let req = test::TestRequest::get().uri(LOGIN_PATH).to_http_request();
        assert!(handle_auth_routes(&req, b"", &sessions, &admin).is_none());

        let req = test::TestRequest::post().uri(ME_PATH).to_http_request();
        assert!(handle_auth_routes(&req, b"", &sessions, &admin).is_none());
    }

    #[actix_web::test]
    async fn test_logout_without_header_is_ok() {
        let sessions = SessionStore::new();
        let admin = AdminCredential::new("secret");
        let req = test::TestRequest::post().uri(LOGOUT_PATH).to_http_request();

        let resp = handle_auth_routes(&req, b"", &sessions, &admin).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["ok"], true);
    }
}
