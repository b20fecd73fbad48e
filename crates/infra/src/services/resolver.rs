//! Resolves who is calling, once per request.
//!
//! Three independent paths produce a [`Principal`]:
//! - user bearer token -> `Principal::User` (the admin gate builds on this)
//! - vendor bearer token that is still in the vendor's active set -> `Principal::Vendor`
//! - server-side session cookie -> `Principal::Session`
//!
//! Every failure on the vendor paths collapses into one message so callers
//! cannot probe which check failed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, warn};

use vendorhub_auth::{AuthzError, Principal, TokenValidator};
use vendorhub_core::{UserId, VendorId};

use crate::error::{ServiceError, ServiceResult};
use crate::session::{SessionId, SessionStore};
use crate::store::{UserStore, VendorStore};

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";

fn not_a_vendor() -> ServiceError {
    ServiceError::Unauthorized(AuthzError::NotVendor.to_string())
}

#[derive(Clone)]
pub struct SessionResolver {
    tokens: Arc<dyn TokenValidator>,
    vendors: Arc<dyn VendorStore>,
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionResolver {
    pub fn new(
        tokens: Arc<dyn TokenValidator>,
        vendors: Arc<dyn VendorStore>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            tokens,
            vendors,
            users,
            sessions,
        }
    }

    /// User gate: a bearer token that decodes to an existing user account.
    pub async fn resolve_user(&self, bearer: Option<&str>) -> ServiceResult<Principal> {
        let token = bearer.ok_or_else(|| ServiceError::unauthorized(NO_TOKEN))?;

        let claims = self.tokens.validate(token, Utc::now()).map_err(|e| {
            warn!(error = %e, "user token rejected");
            ServiceError::unauthorized(TOKEN_FAILED)
        })?;

        match self.users.get(UserId::from_uuid(claims.id)).await {
            Ok(Some(user)) => Ok(Principal::User {
                user_id: user.id,
                is_admin: user.is_admin,
            }),
            Ok(None) => {
                warn!(user_id = %claims.id, "user token for unknown account");
                Err(ServiceError::unauthorized(TOKEN_FAILED))
            }
            Err(e) => {
                error!(error = %e, "user lookup failed");
                Err(ServiceError::unauthorized(TOKEN_FAILED))
            }
        }
    }

    /// Vendor gate: signature and time window, then membership of this exact
    /// token in the vendor's active set, then account-level approval.
    pub async fn resolve_vendor(&self, bearer: Option<&str>) -> ServiceResult<Principal> {
        let token = bearer.ok_or_else(not_a_vendor)?;

        let claims = self.tokens.validate(token, Utc::now()).map_err(|e| {
            warn!(error = %e, "vendor token rejected");
            not_a_vendor()
        })?;
        let vendor_id = VendorId::from_uuid(claims.id);

        let vendor = match self.vendors.find_by_token(vendor_id, token).await {
            Ok(Some(vendor)) => vendor,
            Ok(None) => {
                warn!(vendor_id = %vendor_id, "vendor token not active");
                return Err(not_a_vendor());
            }
            Err(e) => {
                error!(error = %e, "vendor lookup failed");
                return Err(not_a_vendor());
            }
        };

        if !vendor.approved {
            warn!(vendor_id = %vendor_id, "vendor account not approved");
            return Err(not_a_vendor());
        }

        Ok(Principal::Vendor {
            vendor_id,
            token: token.to_string(),
        })
    }

    /// Session gate: a live server-side session.
    pub async fn resolve_session(&self, session: Option<&SessionId>) -> ServiceResult<Principal> {
        let Some(id) = session else {
            return Err(ServiceError::Unauthorized(AuthzError::NoSession.to_string()));
        };

        match self.sessions.load(id, Utc::now()).await? {
            Some(data) => Ok(Principal::Session {
                vendor_id: data.vendor_id,
            }),
            None => Err(ServiceError::Unauthorized(AuthzError::NoSession.to_string())),
        }
    }
}
