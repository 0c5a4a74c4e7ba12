//! Bearer-token gate for the data endpoints.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{ApiError, Config};

// ---

/// Admit the request only if it carries `Authorization: Bearer <API_TOKEN>`.
///
/// With no token configured every request is admitted.
pub async fn require_bearer(State(config): State<Config>, request: Request, next: Next) -> Response {
    // ---
    let Some(expected) = config.api_token.as_deref() else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .is_some_and(|token| token == expected);

    if authorized {
        next.run(request).await
    } else {
        tracing::warn!("Rejected unauthenticated request to {}", request.uri().path());
        ApiError::Unauthorized.into_response()
    }
}

/// Credentials of an `Authorization` value using the `Bearer` scheme.
///
/// The scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    // ---
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_bearer_token() {
        // ---
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER   abc  "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("Bearerabc"), None);
    }
}
