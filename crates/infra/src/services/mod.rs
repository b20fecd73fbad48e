//! Application services.
//!
//! Each service owns the store handles it needs and takes the caller's
//! identity as an explicit argument; the gate decision itself lives in
//! [`resolver`].

mod accounts;
mod catalog;
mod resolver;
mod users;

pub use accounts::VendorAccounts;
pub use catalog::Catalog;
pub use resolver::{NO_TOKEN, SessionResolver, TOKEN_FAILED};
pub use users::UserAccounts;

use vendorhub_auth::{hash_password, verify_password};

use crate::error::{ServiceError, ServiceResult};

// bcrypt is CPU-bound; keep it off the async worker threads.

async fn hash_off_thread(password: String, cost: u32) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))?
        .map_err(ServiceError::from)
}

async fn verify_off_thread(password: String, hash: String) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))?
        .map_err(ServiceError::from)
}
