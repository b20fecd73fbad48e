use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vendorhub_auth::UserAccount;
use vendorhub_catalog::{Vendor, VendorProduct};
use vendorhub_core::{Entity, ProductId, UserId, VendorId};

use super::{ProductStore, StoreError, UserStore, VendorStore};

/// A lock-guarded map of entities keyed by their id.
#[derive(Debug)]
struct Table<E: Entity> {
    rows: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: Entity> Table<E> {
    fn read<R>(&self, f: impl FnOnce(&HashMap<E::Id, E>) -> R) -> Result<R, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(f(&rows))
    }

    fn write<R>(&self, f: impl FnOnce(&mut HashMap<E::Id, E>) -> R) -> Result<R, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(f(&mut rows))
    }
}

/// In-memory vendor store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryVendorStore {
    table: Table<Vendor>,
}

impl InMemoryVendorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VendorStore for InMemoryVendorStore {
    async fn insert(&self, vendor: Vendor) -> Result<(), StoreError> {
        self.table.write(|rows| {
            if rows.values().any(|v| v.email == vendor.email) {
                return Err(StoreError::Duplicate("email".to_string()));
            }
            rows.insert(vendor.id(), vendor);
            Ok(())
        })?
    }

    async fn get(&self, id: VendorId) -> Result<Option<Vendor>, StoreError> {
        self.table.read(|rows| rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Vendor>, StoreError> {
        self.table
            .read(|rows| rows.values().find(|v| v.email == email).cloned())
    }

    async fn find_by_token(
        &self,
        id: VendorId,
        token: &str,
    ) -> Result<Option<Vendor>, StoreError> {
        self.table.read(|rows| {
            rows.get(&id)
                .filter(|v| v.holds_token(token))
                .cloned()
        })
    }

    async fn save(&self, vendor: &Vendor) -> Result<(), StoreError> {
        self.table.write(|rows| match rows.get_mut(&vendor.id) {
            Some(stored) => {
                let tokens = std::mem::take(&mut stored.tokens);
                *stored = Vendor {
                    tokens,
                    ..vendor.clone()
                };
                Ok(())
            }
            None => Err(StoreError::Backend(format!("vendor {} does not exist", vendor.id))),
        })?
    }

    async fn push_token(&self, id: VendorId, token: &str) -> Result<bool, StoreError> {
        self.table.write(|rows| match rows.get_mut(&id) {
            Some(vendor) => {
                vendor.add_token(token.to_string());
                true
            }
            None => false,
        })
    }

    async fn remove_token(&self, id: VendorId, token: &str) -> Result<bool, StoreError> {
        self.table.write(|rows| {
            rows.get_mut(&id)
                .map(|vendor| vendor.revoke_token(token))
                .unwrap_or(false)
        })
    }
}

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    table: Table<VendorProduct>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: VendorProduct) -> Result<(), StoreError> {
        self.table.write(|rows| {
            rows.insert(product.id(), product);
        })
    }

    async fn find_owned(
        &self,
        id: ProductId,
        vendor: VendorId,
    ) -> Result<Option<VendorProduct>, StoreError> {
        self.table.read(|rows| {
            rows.get(&id)
                .filter(|p| p.is_owned_by(vendor))
                .cloned()
        })
    }

    async fn list_by_vendor(&self, vendor: VendorId) -> Result<Vec<VendorProduct>, StoreError> {
        self.table.read(|rows| {
            let mut owned: Vec<VendorProduct> = rows
                .values()
                .filter(|p| p.is_owned_by(vendor))
                .cloned()
                .collect();
            owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            owned
        })
    }

    async fn save(&self, product: &VendorProduct) -> Result<bool, StoreError> {
        self.table.write(|rows| match rows.get_mut(&product.id()) {
            Some(stored) if stored.is_owned_by(product.vendor) => {
                *stored = product.clone();
                true
            }
            _ => false,
        })
    }

    async fn delete_owned(&self, id: ProductId, vendor: VendorId) -> Result<bool, StoreError> {
        self.table.write(|rows| {
            if rows.get(&id).is_some_and(|p| p.is_owned_by(vendor)) {
                rows.remove(&id);
                true
            } else {
                false
            }
        })
    }

    async fn approve(
        &self,
        id: ProductId,
        now: DateTime<Utc>,
    ) -> Result<Option<VendorProduct>, StoreError> {
        self.table.write(|rows| {
            rows.get_mut(&id).map(|p| {
                p.approve(now);
                p.clone()
            })
        })
    }
}

/// In-memory user store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: Table<UserAccount>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: UserAccount) -> Result<(), StoreError> {
        self.table.write(|rows| {
            if rows.values().any(|u| u.email == user.email) {
                return Err(StoreError::Duplicate("email".to_string()));
            }
            rows.insert(user.id(), user);
            Ok(())
        })?
    }

    async fn get(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        self.table.read(|rows| rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        self.table
            .read(|rows| rows.values().find(|u| u.email == email).cloned())
    }
}
