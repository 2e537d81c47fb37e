// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Every request to a protected route passes through [`require_auth`] exactly
//! once, before any handler runs:
//!
//! ```text
//! NoToken ──────────────────────────────► Rejected (401 "No token provided")
//! TokenPresent ── verify ──┬─ ok ───────► Verified (claims in extensions)
//!                          └─ err ──────► Rejected (401 "Invalid or expired token")
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/users/me", get(users::get_current_user))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         require_auth,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, SessionClaims, TokenVerifier};
use crate::state::AppState;

/// Pull the bearer token out of the `Authorization` header.
///
/// Returns `None` for a missing header, a non-ASCII value, a scheme other
/// than `Bearer` (matched case-insensitively) or an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Run the gate against a set of request headers.
pub fn authenticate(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
) -> Result<SessionClaims, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    verifier.verify(token)
}

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.verifier) {
        Ok(claims) => {
            tracing::debug!(user_id = claims.subject(), "request authenticated");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                error_code = err.error_code(),
                error = %err,
                method = %request.method(),
                path = request.uri().path(),
                "authentication rejected"
            );
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tower::ServiceExt;

    use crate::auth::{Principal, Role};
    use crate::config::AuthSettings;

    const SECRET: &str = "middleware-test-secret-0123456789abcd";

    fn test_state() -> AppState {
        AppState::in_memory(&AuthSettings::new(SECRET, "portal-server").unwrap())
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn app(state: AppState, hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/protected",
                get(move |Extension(claims): Extension<SessionClaims>| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        claims.subject().to_string()
                    }
                }),
            )
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    async fn call(app: Router, auth: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn missing_header_is_rejected_before_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = call(app(test_state(), hits.clone()), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"No token provided"}"#);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_scheme_counts_as_no_token() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = call(
            app(test_state(), hits.clone()),
            Some("Basic dXNlcjpwYXNz".into()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"No token provided"}"#);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_before_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = call(
            app(test_state(), hits.clone()),
            Some("Bearer garbage".into()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Invalid or expired token"}"#);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_token_gets_the_same_message_as_garbage() {
        let state = test_state();
        let principal = Principal::new("user_1", "ada@example.com", []).unwrap();
        let token = state
            .issuer
            .issue_at(&principal, chrono::Utc::now().timestamp() - 7200)
            .unwrap()
            .token;

        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = call(app(state, hits.clone()), Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Invalid or expired token"}"#);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_claims() {
        let state = test_state();
        let principal = Principal::new("user_77", "ada@example.com", [Role::User]).unwrap();
        let token = state.issuer.issue(&principal).unwrap().token;

        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = call(app(state, hits.clone()), Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user_77");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
