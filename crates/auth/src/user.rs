//! Generic user accounts (customers and platform admins).
//!
//! Users are a separate identity universe from vendors. The only capability
//! this module cares about is the `is_admin` flag, which unlocks the product
//! approval gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendorhub_core::{Entity, UserId, normalize_email};

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// bcrypt hash; never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password_hash: String,
        is_admin: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: normalize_email(email),
            password_hash,
            is_admin,
            created_at: now,
        }
    }
}

impl Entity for UserAccount {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = UserAccount::new("Admin", "admin@example.com", "$2b$secret".into(), true, Utc::now());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["isAdmin"], true);
    }

    #[test]
    fn email_is_normalized_on_creation() {
        let user = UserAccount::new("A", "  Admin@Example.COM ", String::new(), false, Utc::now());
        assert_eq!(user.email, "admin@example.com");
    }
}
