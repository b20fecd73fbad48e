//! `vendorhub-auth`: authentication/authorization primitives.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how to
//! sign and verify bearer tokens, hash passwords, and describe *who* a caller is,
//! but not where those identities are persisted.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod token;
pub mod user;

pub use authorize::{AuthzError, require_admin, require_session, require_vendor};
pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use principal::{Capabilities, Principal};
pub use token::{DEFAULT_TOKEN_TTL_DAYS, Hs256Tokens, TokenError, TokenValidator};
pub use user::UserAccount;
