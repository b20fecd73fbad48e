use serde::Serialize;

use vendorhub_core::{UserId, VendorId};

/// A caller identity, resolved once per request.
///
/// Vendors and generic users live in disjoint identity universes; this tagged
/// variant is the single type the HTTP layer hands to authorization checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Bearer token matched against a vendor's active token set.
    Vendor { vendor_id: VendorId, token: String },

    /// Bearer token resolved to a generic user account.
    User { user_id: UserId, is_admin: bool },

    /// Cookie-backed dashboard session holding a vendor id.
    Session { vendor_id: VendorId },
}

/// Flattened view of what a principal may act as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub is_vendor: bool,
    pub vendor_id: Option<VendorId>,
    pub is_admin: bool,
    pub user_id: Option<UserId>,
}

impl Principal {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            is_vendor: self.is_vendor(),
            vendor_id: self.vendor_id(),
            is_admin: self.is_admin(),
            user_id: self.user_id(),
        }
    }

    pub fn is_vendor(&self) -> bool {
        self.vendor_id().is_some()
    }

    pub fn vendor_id(&self) -> Option<VendorId> {
        match self {
            Principal::Vendor { vendor_id, .. } | Principal::Session { vendor_id } => Some(*vendor_id),
            Principal::User { .. } => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::User { is_admin: true, .. })
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Principal::User { user_id, .. } => Some(*user_id),
            _ => None,
        }
    }

    /// The raw bearer token, for principals resolved from one.
    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            Principal::Vendor { token, .. } => Some(token),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_token_principal_is_a_vendor_but_not_admin() {
        let vendor_id = VendorId::new();
        let p = Principal::Vendor { vendor_id, token: "t".into() };
        let caps = p.capabilities();

        assert!(caps.is_vendor);
        assert_eq!(caps.vendor_id, Some(vendor_id));
        assert!(!caps.is_admin);
        assert_eq!(caps.user_id, None);
        assert_eq!(p.bearer_token(), Some("t"));
    }

    #[test]
    fn session_principal_carries_vendor_without_token() {
        let vendor_id = VendorId::new();
        let p = Principal::Session { vendor_id };
        assert_eq!(p.vendor_id(), Some(vendor_id));
        assert_eq!(p.bearer_token(), None);
    }

    #[test]
    fn only_admin_users_report_admin() {
        let user_id = UserId::new();
        assert!(Principal::User { user_id, is_admin: true }.is_admin());
        assert!(!Principal::User { user_id, is_admin: false }.is_admin());
        assert!(!Principal::User { user_id, is_admin: true }.is_vendor());
    }
}
