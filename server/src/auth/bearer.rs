use actix_web::http::header::{HeaderMap, AUTHORIZATION};

const BEARER_PREFIX: &str = "Bearer ";

/// Pulls the raw token out of `Authorization: Bearer <token>`.
///
/// The prefix match is case-sensitive and the remainder is returned verbatim.
/// A missing header, another scheme, or a value that is not visible ASCII all
/// yield `None`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extracts_token() {
        let headers = headers_with("Bearer my-token");
        assert_eq!(extract_bearer_token(&headers), Some("my-token"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_other_scheme() {
        assert_eq!(extract_bearer_token(&headers_with("Basic xyz")), None);
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_eq!(extract_bearer_token(&headers_with("bearer my-token")), None);
        assert_eq!(extract_bearer_token(&headers_with("BEARER my-token")), None);
    }

    #[test]
    fn test_requires_single_space() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer")), None);
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer  two-spaces")),
            Some(" two-spaces")
        );
    }

    #[test]
    fn test_empty_token_after_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str("Bearer ").unwrap());
        assert_eq!(extract_bearer_token(&headers), Some(""));
    }
}
