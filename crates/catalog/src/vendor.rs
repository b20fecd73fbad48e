//! Vendor (seller) accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendorhub_core::{DomainError, DomainResult, Entity, VendorId, is_plausible_email, normalize_email};

/// Minimum accepted password length at registration and password change.
pub const MIN_PASSWORD_LEN: usize = 6;

/// What kind of business a vendor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    Manufacturer,
    Wholesaler,
    Distributor,
    Retailer,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Manufacturer => "Manufacturer",
            BusinessType::Wholesaler => "Wholesaler",
            BusinessType::Distributor => "Distributor",
            BusinessType::Retailer => "Retailer",
        }
    }
}

impl core::fmt::Display for BusinessType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for BusinessType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Manufacturer" => Ok(BusinessType::Manufacturer),
            "Wholesaler" => Ok(BusinessType::Wholesaler),
            "Distributor" => Ok(BusinessType::Distributor),
            "Retailer" => Ok(BusinessType::Retailer),
            other => Err(DomainError::validation(format!(
                "businessType must be one of Manufacturer, Wholesaler, Distributor, Retailer (got '{other}')"
            ))),
        }
    }
}

/// Postal address; every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

/// Registration payload.
///
/// Required fields are plain types so a missing one fails deserialization;
/// [`VendorRegistration::validate`] covers what serde cannot (blank strings,
/// email shape, password length).
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub business_type: BusinessType,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

impl core::fmt::Debug for VendorRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VendorRegistration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("company_name", &self.company_name)
            .field("business_type", &self.business_type)
            .finish_non_exhaustive()
    }
}

impl VendorRegistration {
    pub fn validate(&self) -> DomainResult<()> {
        require_non_blank("name", &self.name)?;
        require_non_blank("companyName", &self.company_name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// Persisted vendor record.
///
/// Outward serialization never includes the password hash or the issued
/// bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub company_name: String,
    pub business_type: BusinessType,
    pub address: Address,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub tax_id: Option<String>,
    /// Account-level approval; vendors are auto-approved at registration.
    pub approved: bool,
    /// Active bearer tokens. Appended on login, removed only by explicit revocation.
    #[serde(skip_serializing, default)]
    pub tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// Build a vendor from a validated registration. The plaintext password is dropped here.
    pub fn register(reg: VendorRegistration, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: VendorId::new(),
            name: reg.name.trim().to_string(),
            email: normalize_email(&reg.email),
            password_hash,
            company_name: reg.company_name.trim().to_string(),
            business_type: reg.business_type,
            address: reg.address,
            phone: reg.phone,
            website: reg.website,
            tax_id: reg.tax_id,
            approved: true,
            tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn holds_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Record a newly issued token. Re-adding an identical token is a no-op.
    pub fn add_token(&mut self, token: String) {
        if !self.holds_token(&token) {
            self.tokens.push(token);
        }
    }

    /// Remove a token from the active set; returns whether it was present.
    pub fn revoke_token(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    pub fn set_password_hash(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.updated_at = now;
    }
}

impl Entity for Vendor {
    type Id = VendorId;

    fn id(&self) -> VendorId {
        self.id
    }
}

pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    if is_plausible_email(email) {
        Ok(())
    } else {
        Err(DomainError::validation("email is not a valid address"))
    }
}

fn require_non_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration() -> VendorRegistration {
        serde_json::from_value(json!({
            "name": "Ada",
            "email": "  Ada@Example.com ",
            "password": "s3cret!",
            "companyName": "Analytical Engines Ltd",
            "businessType": "Manufacturer",
            "address": { "city": "London", "zipCode": "N1" },
            "taxId": "GB123"
        }))
        .unwrap()
    }

    #[test]
    fn registered_vendor_is_auto_approved_with_no_tokens() {
        let reg = registration();
        reg.validate().unwrap();
        let vendor = Vendor::register(reg, "hash".into(), Utc::now());

        assert!(vendor.approved);
        assert!(vendor.tokens.is_empty());
        assert_eq!(vendor.email, "ada@example.com");
        assert_eq!(vendor.address.zip_code.as_deref(), Some("N1"));
    }

    #[test]
    fn unknown_business_type_fails_deserialization() {
        let res = serde_json::from_value::<VendorRegistration>(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "s3cret!",
            "companyName": "AE",
            "businessType": "Pirate"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn blank_fields_and_short_passwords_are_rejected() {
        let mut reg = registration();
        reg.company_name = "   ".into();
        assert_eq!(
            reg.validate(),
            Err(DomainError::validation("companyName is required"))
        );

        let mut reg = registration();
        reg.password = "12345".into();
        assert!(matches!(reg.validate(), Err(DomainError::Validation(_))));

        let mut reg = registration();
        reg.email = "no-at-sign.example.com".into();
        assert!(matches!(reg.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", registration());
        assert!(!rendered.contains("s3cret!"));
    }

    #[test]
    fn token_set_deduplicates_and_revokes() {
        let mut vendor = Vendor::register(registration(), "hash".into(), Utc::now());
        vendor.add_token("a".into());
        vendor.add_token("a".into());
        vendor.add_token("b".into());
        assert_eq!(vendor.tokens, vec!["a".to_string(), "b".to_string()]);

        assert!(vendor.revoke_token("a"));
        assert!(!vendor.revoke_token("a"));
        assert!(!vendor.holds_token("a"));
        assert!(vendor.holds_token("b"));
    }

    #[test]
    fn serialization_hides_secrets() {
        let mut vendor = Vendor::register(registration(), "hash".into(), Utc::now());
        vendor.add_token("bearer".into());
        let json = serde_json::to_value(&vendor).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("tokens").is_none());
        assert_eq!(json["companyName"], "Analytical Engines Ltd");
        assert_eq!(json["businessType"], "Manufacturer");
    }

    #[test]
    fn business_type_parses_exact_names() {
        assert_eq!("Retailer".parse::<BusinessType>(), Ok(BusinessType::Retailer));
        assert!("retailer".parse::<BusinessType>().is_err());
    }
}
