//! Persistence seams for vendors, products and admin users.
//!
//! Every trait is object-safe so the API layer can hold `Arc<dyn ...>` and swap
//! the in-memory backend (tests/dev) for Postgres without touching handlers.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use vendorhub_auth::UserAccount;
use vendorhub_catalog::{Vendor, VendorProduct};
use vendorhub_core::{ProductId, UserId, VendorId};

pub use in_memory::{InMemoryProductStore, InMemoryUserStore, InMemoryVendorStore};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. a second vendor with the same email).
    #[error("{0} is already registered")]
    Duplicate(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Insert a new vendor. Fails with `Duplicate` when the email is taken.
    async fn insert(&self, vendor: Vendor) -> Result<(), StoreError>;

    async fn get(&self, id: VendorId) -> Result<Option<Vendor>, StoreError>;

    /// Lookup by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Vendor>, StoreError>;

    /// The vendor with `id`, only if `token` is still in its active token set.
    async fn find_by_token(&self, id: VendorId, token: &str)
    -> Result<Option<Vendor>, StoreError>;

    /// Overwrite a stored vendor's profile fields and password hash.
    ///
    /// The token set is not touched; use `push_token`/`remove_token`.
    async fn save(&self, vendor: &Vendor) -> Result<(), StoreError>;

    /// Append `token` to the vendor's active set. Returns `false` if the vendor is gone.
    async fn push_token(&self, id: VendorId, token: &str) -> Result<bool, StoreError>;

    /// Remove `token` from the vendor's active set. Returns whether it was present.
    async fn remove_token(&self, id: VendorId, token: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: VendorProduct) -> Result<(), StoreError>;

    /// Lookup scoped to an owner: another vendor's product is indistinguishable
    /// from a missing one.
    async fn find_owned(
        &self,
        id: ProductId,
        vendor: VendorId,
    ) -> Result<Option<VendorProduct>, StoreError>;

    /// All products owned by `vendor`, newest first.
    async fn list_by_vendor(&self, vendor: VendorId) -> Result<Vec<VendorProduct>, StoreError>;

    /// Overwrite a product that still exists under the same owner (last write
    /// wins). Returns `false` without writing when the row is gone.
    async fn save(&self, product: &VendorProduct) -> Result<bool, StoreError>;

    /// Delete a product only if `vendor` owns it. Returns whether a row was removed.
    async fn delete_owned(&self, id: ProductId, vendor: VendorId) -> Result<bool, StoreError>;

    /// Mark a product approved regardless of owner and return the updated row.
    async fn approve(
        &self,
        id: ProductId,
        now: DateTime<Utc>,
    ) -> Result<Option<VendorProduct>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` when the email is taken.
    async fn insert(&self, user: UserAccount) -> Result<(), StoreError>;

    async fn get(&self, id: UserId) -> Result<Option<UserAccount>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;
}

#[derive(Clone)]
enum Backend {
    InMemory,
    #[cfg(feature = "postgres")]
    Postgres(sqlx::PgPool),
}

/// The set of stores one process runs against, plus the lifecycle of the
/// backend behind them.
#[derive(Clone)]
pub struct Stores {
    pub vendors: Arc<dyn VendorStore>,
    pub products: Arc<dyn ProductStore>,
    pub users: Arc<dyn UserStore>,
    backend: Backend,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            vendors: Arc::new(InMemoryVendorStore::new()),
            products: Arc::new(InMemoryProductStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            backend: Backend::InMemory,
        }
    }

    /// Connect to Postgres and make sure the schema exists.
    #[cfg(feature = "postgres")]
    pub async fn connect_postgres(database_url: &str) -> Result<Self, StoreError> {
        let pool = postgres::connect(database_url).await?;
        Ok(Self {
            vendors: Arc::new(postgres::PostgresVendorStore::new(pool.clone())),
            products: Arc::new(postgres::PostgresProductStore::new(pool.clone())),
            users: Arc::new(postgres::PostgresUserStore::new(pool.clone())),
            backend: Backend::Postgres(pool),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::InMemory => "in-memory",
            #[cfg(feature = "postgres")]
            Backend::Postgres(_) => "postgres",
        }
    }

    /// Release backend resources. Called once after the server stops accepting requests.
    pub async fn close(&self) {
        match &self.backend {
            Backend::InMemory => {}
            #[cfg(feature = "postgres")]
            Backend::Postgres(pool) => pool.close().await,
        }
        tracing::info!(backend = self.backend_name(), "store closed");
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("backend", &self.backend_name())
            .finish_non_exhaustive()
    }
}
