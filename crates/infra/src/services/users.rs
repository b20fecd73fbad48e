//! Generic user accounts: credential login and the startup admin seed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use vendorhub_auth::{Hs256Tokens, UserAccount};
use vendorhub_catalog::vendor::validate_password;
use vendorhub_core::{is_plausible_email, normalize_email};

use super::{hash_off_thread, verify_off_thread};
use crate::error::{ServiceError, ServiceResult};
use crate::store::UserStore;

#[derive(Clone)]
pub struct UserAccounts {
    users: Arc<dyn UserStore>,
    tokens: Arc<Hs256Tokens>,
    bcrypt_cost: u32,
}

impl UserAccounts {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<Hs256Tokens>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> ServiceResult<UserAccount> {
        if name.trim().is_empty() {
            return Err(ServiceError::validation("name is required"));
        }
        if !is_plausible_email(email) {
            return Err(ServiceError::validation("email is not a valid address"));
        }
        validate_password(password)?;

        let hash = hash_off_thread(password.to_string(), self.bcrypt_cost).await?;
        let user = UserAccount::new(name.trim(), email, hash, is_admin, Utc::now());
        self.users.insert(user.clone()).await?;
        info!(user_id = %user.id, is_admin, "user created");
        Ok(user)
    }

    /// Ensure an admin account exists for `email`. An existing account is left as is.
    pub async fn seed_admin(&self, name: &str, email: &str, password: &str) -> ServiceResult<UserAccount> {
        if let Some(existing) = self.users.find_by_email(&normalize_email(email)).await? {
            if !existing.is_admin {
                warn!(user_id = %existing.id, "seed email belongs to a non-admin account");
            }
            return Ok(existing);
        }
        self.create(name, email, password, true).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<(UserAccount, String)> {
        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            warn!("user login rejected: unknown email");
            return Err(ServiceError::unauthorized("Invalid email or password"));
        };

        if !verify_off_thread(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "user login rejected: wrong password");
            return Err(ServiceError::unauthorized("Invalid email or password"));
        }

        let token = self.tokens.issue(*user.id.as_uuid(), Utc::now())?;
        info!(user_id = %user.id, is_admin = user.is_admin, "user logged in");
        Ok((user, token))
    }
}

#[cfg(test)]
mod tests {
    use crate::services::fixtures::harness;

    use super::*;

    #[tokio::test]
    async fn seed_admin_is_idempotent() {
        let h = harness();
        let first = h.users.seed_admin("Root", "Root@Example.com", "rootpass").await.unwrap();
        let second = h.users.seed_admin("Root", "root@example.com", "other-pass").await.unwrap();
        assert!(first.is_admin);
        assert_eq!(first.id, second.id);

        // The first password still works.
        assert!(h.users.login("root@example.com", "rootpass").await.is_ok());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let h = harness();
        h.users.create("Joe", "joe@example.com", "joepass", false).await.unwrap();
        let err = h.users.login("joe@example.com", "nope!!").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn create_validates_input() {
        let h = harness();
        assert!(h.users.create(" ", "joe@example.com", "joepass", false).await.is_err());
        assert!(h.users.create("Joe", "not-an-email", "joepass", false).await.is_err());
        assert!(h.users.create("Joe", "joe@example.com", "123", false).await.is_err());
    }
}
