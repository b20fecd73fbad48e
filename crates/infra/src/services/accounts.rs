//! Vendor account lifecycle: registration, credential login, profile,
//! password change and bearer-token revocation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use vendorhub_auth::Hs256Tokens;
use vendorhub_catalog::{Vendor, VendorRegistration, vendor::validate_password};
use vendorhub_core::{VendorId, normalize_email};

use super::{hash_off_thread, verify_off_thread};
use crate::error::{ServiceError, ServiceResult};
use crate::store::VendorStore;

/// Message for any failed credential check; never says which half was wrong.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Clone)]
pub struct VendorAccounts {
    vendors: Arc<dyn VendorStore>,
    tokens: Arc<Hs256Tokens>,
    bcrypt_cost: u32,
}

impl VendorAccounts {
    pub fn new(vendors: Arc<dyn VendorStore>, tokens: Arc<Hs256Tokens>, bcrypt_cost: u32) -> Self {
        Self {
            vendors,
            tokens,
            bcrypt_cost,
        }
    }

    /// Create an (auto-approved) vendor and hand back its first bearer token.
    pub async fn register(&self, reg: VendorRegistration) -> ServiceResult<(Vendor, String)> {
        reg.validate()?;

        let email = normalize_email(&reg.email);
        if self.vendors.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::validation("email is already registered"));
        }

        let now = Utc::now();
        let hash = hash_off_thread(reg.password.clone(), self.bcrypt_cost).await?;
        let mut vendor = Vendor::register(reg, hash, now);

        let token = self.tokens.issue(*vendor.id.as_uuid(), now)?;
        vendor.add_token(token.clone());
        self.vendors.insert(vendor.clone()).await?;

        info!(vendor_id = %vendor.id, "vendor registered");
        Ok((vendor, token))
    }

    /// Check credentials and append a freshly issued token to the vendor's set.
    ///
    /// Unapproved vendors may still log in; the vendor gate rejects them later.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<(Vendor, String)> {
        let email = normalize_email(email);
        let Some(mut vendor) = self.vendors.find_by_email(&email).await? else {
            warn!("vendor login rejected: unknown email");
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_off_thread(password.to_string(), vendor.password_hash.clone()).await? {
            warn!(vendor_id = %vendor.id, "vendor login rejected: wrong password");
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.tokens.issue(*vendor.id.as_uuid(), Utc::now())?;
        if !self.vendors.push_token(vendor.id, &token).await? {
            return Err(ServiceError::NotFound("vendor"));
        }
        vendor.add_token(token.clone());
        debug!(vendor_id = %vendor.id, active_tokens = vendor.tokens.len(), "token issued");

        info!(vendor_id = %vendor.id, "vendor logged in");
        Ok((vendor, token))
    }

    pub async fn profile(&self, vendor_id: VendorId) -> ServiceResult<Vendor> {
        self.vendors
            .get(vendor_id)
            .await?
            .ok_or(ServiceError::NotFound("vendor"))
    }

    pub async fn change_password(
        &self,
        vendor_id: VendorId,
        current: &str,
        new: &str,
    ) -> ServiceResult<()> {
        let mut vendor = self.profile(vendor_id).await?;

        if !verify_off_thread(current.to_string(), vendor.password_hash.clone()).await? {
            warn!(vendor_id = %vendor_id, "password change rejected: wrong current password");
            return Err(ServiceError::unauthorized("current password is incorrect"));
        }
        validate_password(new)?;

        let hash = hash_off_thread(new.to_string(), self.bcrypt_cost).await?;
        vendor.set_password_hash(hash, Utc::now());
        self.vendors.save(&vendor).await?;

        info!(vendor_id = %vendor_id, "vendor password changed");
        Ok(())
    }

    /// Drop `token` from the vendor's active set. Idempotent.
    pub async fn revoke_token(&self, vendor_id: VendorId, token: &str) -> ServiceResult<()> {
        let removed = self.vendors.remove_token(vendor_id, token).await?;
        info!(vendor_id = %vendor_id, removed, "bearer token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vendorhub_auth::TokenValidator;

    use crate::services::fixtures::{harness, registration};

    use super::*;

    #[tokio::test]
    async fn register_issues_an_active_token() {
        let h = harness();
        let (vendor, token) = h.accounts.register(registration("Ada@Example.com ")).await.unwrap();

        assert_eq!(vendor.email, "ada@example.com");
        assert!(vendor.approved);
        assert_ne!(vendor.password_hash, "secret1");

        let claims = h.tokens.validate(&token, Utc::now()).unwrap();
        assert_eq!(&claims.id, vendor.id.as_uuid());
        assert!(h.stores.vendors.find_by_token(vendor.id, &token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_validation_error() {
        let h = harness();
        h.accounts.register(registration("ada@example.com")).await.unwrap();
        let err = h
            .accounts
            .register(registration("ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_registration_is_rejected_before_hashing() {
        let h = harness();
        let mut reg = registration("ada@example.com");
        reg.password = "123".to_string();
        let err = h.accounts.register(reg).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(h.stores.vendors.find_by_email("ada@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn every_login_appends_a_token() {
        let h = harness();
        let (vendor, first) = h.accounts.register(registration("ada@example.com")).await.unwrap();

        // Tokens minted within the same second are identical; wait for a fresh `iat`.
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let (_, second) = h.accounts.login("ada@example.com", "secret1").await.unwrap();
        assert_ne!(first, second);

        let stored = h.stores.vendors.get(vendor.id).await.unwrap().unwrap();
        assert!(stored.holds_token(&first));
        assert!(stored.holds_token(&second));
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let h = harness();
        h.accounts.register(registration("ada@example.com")).await.unwrap();

        let wrong_password = h.accounts.login("ada@example.com", "nope!!").await.unwrap_err();
        let unknown_email = h.accounts.login("bob@example.com", "secret1").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let h = harness();
        let (vendor, token) = h.accounts.register(registration("ada@example.com")).await.unwrap();

        let err = h
            .accounts
            .change_password(vendor.id, "wrong!", "brand-new")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        h.accounts
            .change_password(vendor.id, "secret1", "brand-new")
            .await
            .unwrap();
        assert!(h.accounts.login("ada@example.com", "secret1").await.is_err());
        assert!(h.accounts.login("ada@example.com", "brand-new").await.is_ok());

        // Existing tokens survive a password change.
        assert!(h.stores.vendors.find_by_token(vendor.id, &token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn revoke_removes_only_that_token() {
        let h = harness();
        let (vendor, token) = h.accounts.register(registration("ada@example.com")).await.unwrap();

        h.accounts.revoke_token(vendor.id, &token).await.unwrap();
        h.accounts.revoke_token(vendor.id, &token).await.unwrap();
        assert!(h.stores.vendors.find_by_token(vendor.id, &token).await.unwrap().is_none());
    }
}
