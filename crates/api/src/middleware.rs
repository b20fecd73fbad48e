//! Gate middleware.
//!
//! Each gate resolves one kind of caller and inserts a [`PrincipalContext`]
//! into the request extensions; handlers then check capabilities through
//! [`crate::authz`].

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use tracing::debug;

use vendorhub_auth::Principal;
use vendorhub_infra::SessionId;
use vendorhub_infra::services::SessionResolver;

use crate::app::errors::ApiError;
use crate::authz;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct GateState {
    pub resolver: SessionResolver,
    pub session_cookie: String,
}

/// User gate: bearer token for a generic user account.
pub async fn protect(
    State(state): State<GateState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = state.resolver.resolve_user(extract_bearer(req.headers())).await?;
    attach(&mut req, principal);
    Ok(next.run(req).await)
}

/// Admin sub-gate. Must run after [`protect`].
pub async fn admin(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<PrincipalContext>() {
        Some(ctx) => {
            authz::admin_user(ctx)?;
        }
        None => return Err(ApiError::forbidden("Not authorized as an admin")),
    }
    Ok(next.run(req).await)
}

/// Vendor gate: bearer token that is still active for an approved vendor.
pub async fn vendor_auth(
    State(state): State<GateState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = state.resolver.resolve_vendor(extract_bearer(req.headers())).await?;
    attach(&mut req, principal);
    Ok(next.run(req).await)
}

/// Session gate: the dashboard's cookie-backed session.
pub async fn require_session(
    State(state): State<GateState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = session_id(req.headers(), &state.session_cookie);
    let principal = state.resolver.resolve_session(session.as_ref()).await?;
    attach(&mut req, principal);
    Ok(next.run(req).await)
}

fn attach(req: &mut Request, principal: Principal) {
    let ctx = PrincipalContext::new(principal);
    debug!(capabilities = ?ctx.capabilities(), "principal resolved");
    req.extensions_mut().insert(ctx);
}

pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Session id from the named cookie, if the request carries one.
pub(crate) fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| SessionId::from(value))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_requires_scheme_and_value() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers), Some("abc.def"));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; vendorhub.sid=abc123"));
        headers.append(header::COOKIE, HeaderValue::from_static("other=1"));

        let id = session_id(&headers, "vendorhub.sid").unwrap();
        assert_eq!(id.as_str(), "abc123");
        assert!(session_id(&headers, "missing").is_none());
    }

    #[test]
    fn empty_session_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("vendorhub.sid="));
        assert!(session_id(&headers, "vendorhub.sid").is_none());
    }
}
