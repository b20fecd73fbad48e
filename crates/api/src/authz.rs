//! Capability guards for handlers.
//!
//! Thin wrappers over the pure checks in `vendorhub_auth::authorize` that
//! speak `ApiError`, so handlers can use `?`.

use vendorhub_auth::{require_admin, require_session, require_vendor};
use vendorhub_core::{UserId, VendorId};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// Vendor resolved from a bearer token, plus the raw token.
pub fn bearer_vendor(ctx: &PrincipalContext) -> Result<(VendorId, &str), ApiError> {
    Ok(require_vendor(ctx.principal())?)
}

/// Vendor resolved from the session cookie.
pub fn session_vendor(ctx: &PrincipalContext) -> Result<VendorId, ApiError> {
    Ok(require_session(ctx.principal())?)
}

pub fn admin_user(ctx: &PrincipalContext) -> Result<UserId, ApiError> {
    Ok(require_admin(ctx.principal())?)
}
