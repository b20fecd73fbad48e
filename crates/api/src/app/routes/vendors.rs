use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    http::{HeaderMap, StatusCode, header},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use tracing::{error, info};

use vendorhub_catalog::{Vendor, VendorRegistration};

use crate::app::dto::{ChangePasswordRequest, LoginRequest, VendorSummary};
use crate::app::errors::ApiError;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;
use crate::middleware::{self, GateState};

pub fn router(gates: GateState) -> Router {
    let session_routes = Router::new()
        .route("/profile", get(profile))
        .route("/password", put(change_password))
        .route_layer(from_fn_with_state(gates.clone(), middleware::require_session));

    let token_routes = Router::new()
        .route("/tokens/current", delete(revoke_current_token))
        .route_layer(from_fn_with_state(gates, middleware::vendor_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(session_routes)
        .merge(token_routes)
}

fn session_cookie(name: &str, value: &str, max_age_secs: i64) -> String {
    format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<VendorRegistration>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (vendor, token) = services.accounts.register(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "vendor": VendorSummary::from(&vendor),
            "token": token,
        })),
    ))
}

/// Credential login. Starts a fresh server-side session and also returns a
/// bearer token for the product API.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let (vendor, token) = services.accounts.login(&body.email, &body.password).await?;

    if let Some(previous) = middleware::session_id(&headers, &services.session_cookie) {
        services.sessions.destroy(&previous).await.map_err(|e| {
            error!(error = %e, "failed to drop previous session");
            ApiError::server("Server error during login")
        })?;
    }

    let session = services
        .sessions
        .create(vendor.id, chrono::Utc::now())
        .await
        .map_err(|e| {
            error!(error = %e, "failed to create session");
            ApiError::server("Server error during login")
        })?;

    let cookie = session_cookie(
        &services.session_cookie,
        session.as_str(),
        services.session_ttl.num_seconds(),
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "vendor": VendorSummary::from(&vendor),
            "token": token,
        })),
    )
        .into_response())
}

pub async fn profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> Result<Json<Vendor>, ApiError> {
    let vendor_id = authz::session_vendor(&ctx)?;
    Ok(Json(services.accounts.profile(vendor_id).await?))
}

/// Ends the dashboard session. Bearer tokens issued at login stay valid;
/// `DELETE /vendors/tokens/current` revokes those.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(session) = middleware::session_id(&headers, &services.session_cookie) {
        services.sessions.destroy(&session).await.map_err(|e| {
            error!(error = %e, "failed to destroy session");
            ApiError::server("Logout failed")
        })?;
        info!("vendor session ended");
    }

    Ok((
        [(header::SET_COOKIE, session_cookie(&services.session_cookie, "", 0))],
        Json(json!({
            "success": true,
            "message": "Logged out successfully",
        })),
    )
        .into_response())
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let vendor_id = authz::session_vendor(&ctx)?;
    services
        .accounts
        .change_password(vendor_id, &body.current_password, &body.new_password)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Password updated",
    })))
}

pub async fn revoke_current_token(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> Result<Json<Value>, ApiError> {
    let (vendor_id, token) = authz::bearer_vendor(&ctx)?;
    services.accounts.revoke_token(vendor_id, token).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Token revoked",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("vendorhub.sid", "abc", 3600);
        assert_eq!(cookie, "vendorhub.sid=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600");
    }
}
