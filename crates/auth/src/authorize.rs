//! Capability checks on a resolved [`Principal`].
//!
//! - No IO
//! - No panics
//! - Pure policy: the gates in the HTTP layer resolve *who*, these decide *may*.

use thiserror::Error;

use vendorhub_core::{UserId, VendorId};

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Please authenticate as a vendor")]
    NotVendor,

    #[error("Please authenticate as a vendor")]
    NoSession,

    #[error("Not authorized as an admin")]
    NotAdmin,
}

/// Require a vendor resolved from a bearer token (the vendor product API path).
pub fn require_vendor(principal: &Principal) -> Result<(VendorId, &str), AuthzError> {
    match principal {
        Principal::Vendor { vendor_id, token } => Ok((*vendor_id, token.as_str())),
        _ => Err(AuthzError::NotVendor),
    }
}

/// Require a cookie-backed vendor session (the dashboard path).
pub fn require_session(principal: &Principal) -> Result<VendorId, AuthzError> {
    match principal {
        Principal::Session { vendor_id } => Ok(*vendor_id),
        _ => Err(AuthzError::NoSession),
    }
}

/// Require a user account carrying the admin flag.
pub fn require_admin(principal: &Principal) -> Result<UserId, AuthzError> {
    match principal {
        Principal::User { user_id, is_admin: true } => Ok(*user_id),
        _ => Err(AuthzError::NotAdmin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_check_rejects_vendors_and_plain_users() {
        let vendor = Principal::Vendor { vendor_id: VendorId::new(), token: "t".into() };
        let user = Principal::User { user_id: UserId::new(), is_admin: false };
        assert_eq!(require_admin(&vendor), Err(AuthzError::NotAdmin));
        assert_eq!(require_admin(&user), Err(AuthzError::NotAdmin));
    }

    #[test]
    fn admin_check_returns_user_id() {
        let user_id = UserId::new();
        let admin = Principal::User { user_id, is_admin: true };
        assert_eq!(require_admin(&admin), Ok(user_id));
    }

    #[test]
    fn session_does_not_satisfy_vendor_api_gate() {
        let vendor_id = VendorId::new();
        let session = Principal::Session { vendor_id };
        assert_eq!(require_vendor(&session), Err(AuthzError::NotVendor));
        assert_eq!(require_session(&session), Ok(vendor_id));
    }

    #[test]
    fn vendor_gate_exposes_token() {
        let vendor_id = VendorId::new();
        let p = Principal::Vendor { vendor_id, token: "abc".into() };
        assert_eq!(require_vendor(&p), Ok((vendor_id, "abc")));
    }
}
