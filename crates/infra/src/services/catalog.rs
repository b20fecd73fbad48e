//! Ownership-scoped product operations and the admin approval gate.
//!
//! Read-modify-write sequences are not transactional: concurrent edits to
//! the same listing resolve as last write wins.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use vendorhub_catalog::{NewProduct, ProductPatch, VendorProduct};
use vendorhub_core::{ProductId, UserId, VendorId};

use crate::error::{ServiceError, ServiceResult};
use crate::store::ProductStore;

#[derive(Clone)]
pub struct Catalog {
    products: Arc<dyn ProductStore>,
}

impl Catalog {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    pub async fn create(&self, vendor: VendorId, input: NewProduct) -> ServiceResult<VendorProduct> {
        let product = VendorProduct::create(vendor, input, Utc::now())?;
        self.products.insert(product.clone()).await?;
        info!(vendor_id = %vendor, product_id = %product.id, "product created");
        Ok(product)
    }

    pub async fn list_mine(&self, vendor: VendorId) -> ServiceResult<Vec<VendorProduct>> {
        Ok(self.products.list_by_vendor(vendor).await?)
    }

    pub async fn get_owned(&self, vendor: VendorId, id: ProductId) -> ServiceResult<VendorProduct> {
        self.products
            .find_owned(id, vendor)
            .await?
            .ok_or(ServiceError::NotFound("product"))
    }

    pub async fn update_owned(
        &self,
        vendor: VendorId,
        id: ProductId,
        patch: ProductPatch,
    ) -> ServiceResult<VendorProduct> {
        let mut product = self.get_owned(vendor, id).await?;
        product.apply_patch(patch, Utc::now())?;
        if !self.products.save(&product).await? {
            return Err(ServiceError::NotFound("product"));
        }
        info!(vendor_id = %vendor, product_id = %id, "product updated; approval reset");
        Ok(product)
    }

    pub async fn delete_owned(&self, vendor: VendorId, id: ProductId) -> ServiceResult<()> {
        if !self.products.delete_owned(id, vendor).await? {
            return Err(ServiceError::NotFound("product"));
        }
        info!(vendor_id = %vendor, product_id = %id, "product deleted");
        Ok(())
    }

    /// Admin path: ownership is irrelevant and content is not re-validated.
    pub async fn approve(&self, admin: UserId, id: ProductId) -> ServiceResult<VendorProduct> {
        let product = self
            .products
            .approve(id, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound("product"))?;
        info!(admin_id = %admin, product_id = %id, "product approved");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use crate::services::fixtures::harness;
    use crate::store::{InMemoryProductStore, StoreError};

    use super::*;

    /// Deletes the row right after handing it out, as a concurrent DELETE would.
    #[derive(Default)]
    struct DeletedMidUpdate {
        inner: InMemoryProductStore,
    }

    #[async_trait]
    impl ProductStore for DeletedMidUpdate {
        async fn insert(&self, product: VendorProduct) -> Result<(), StoreError> {
            self.inner.insert(product).await
        }

        async fn find_owned(
            &self,
            id: ProductId,
            vendor: VendorId,
        ) -> Result<Option<VendorProduct>, StoreError> {
            let found = self.inner.find_owned(id, vendor).await?;
            self.inner.delete_owned(id, vendor).await?;
            Ok(found)
        }

        async fn list_by_vendor(&self, vendor: VendorId) -> Result<Vec<VendorProduct>, StoreError> {
            self.inner.list_by_vendor(vendor).await
        }

        async fn save(&self, product: &VendorProduct) -> Result<bool, StoreError> {
            self.inner.save(product).await
        }

        async fn delete_owned(&self, id: ProductId, vendor: VendorId) -> Result<bool, StoreError> {
            self.inner.delete_owned(id, vendor).await
        }

        async fn approve(
            &self,
            id: ProductId,
            now: DateTime<Utc>,
        ) -> Result<Option<VendorProduct>, StoreError> {
            self.inner.approve(id, now).await
        }
    }

    fn hammer() -> NewProduct {
        NewProduct {
            name: "Hammer".to_string(),
            description: "Claw hammer".to_string(),
            price: 10.0,
            category: "tools".to_string(),
            stock: 5,
            images: vec![],
            attributes: Default::default(),
        }
    }

    #[tokio::test]
    async fn create_is_owned_and_unapproved() {
        let h = harness();
        let owner = VendorId::new();
        let product = h.catalog.create(owner, hammer()).await.unwrap();
        assert_eq!(product.vendor, owner);
        assert!(!product.approved);
        assert_eq!(h.catalog.list_mine(owner).await.unwrap(), vec![product]);
    }

    #[tokio::test]
    async fn invalid_product_is_a_validation_error() {
        let h = harness();
        let mut input = hammer();
        input.category = String::new();
        let err = h.catalog.create(VendorId::new(), input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn foreign_products_look_missing() {
        let h = harness();
        let (alice, bob) = (VendorId::new(), VendorId::new());
        let product = h.catalog.create(alice, hammer()).await.unwrap();

        let read = h.catalog.get_owned(bob, product.id).await.unwrap_err();
        let update = h
            .catalog
            .update_owned(bob, product.id, ProductPatch::default())
            .await
            .unwrap_err();
        let delete = h.catalog.delete_owned(bob, product.id).await.unwrap_err();
        let missing = h.catalog.get_owned(bob, ProductId::new()).await.unwrap_err();

        for err in [read, update, delete, missing] {
            assert!(matches!(err, ServiceError::NotFound("product")));
        }
        assert!(h.catalog.get_owned(alice, product.id).await.is_ok());
    }

    #[tokio::test]
    async fn zero_price_and_stock_are_ignored_on_update() {
        let h = harness();
        let owner = VendorId::new();
        let product = h.catalog.create(owner, hammer()).await.unwrap();

        let patch = ProductPatch {
            price: Some(0.0),
            stock: Some(0),
            ..Default::default()
        };
        let updated = h.catalog.update_owned(owner, product.id, patch).await.unwrap();
        assert_eq!(updated.price, 10.0);
        assert_eq!(updated.stock, 5);
    }

    #[tokio::test]
    async fn approval_ignores_owner_and_update_resets_it() {
        let h = harness();
        let owner = VendorId::new();
        let product = h.catalog.create(owner, hammer()).await.unwrap();

        let approved = h.catalog.approve(UserId::new(), product.id).await.unwrap();
        assert!(approved.approved);
        assert!(h.catalog.get_owned(owner, product.id).await.unwrap().approved);

        let patch = ProductPatch {
            price: Some(12.5),
            ..Default::default()
        };
        let updated = h.catalog.update_owned(owner, product.id, patch).await.unwrap();
        assert!(!updated.approved);
        assert_eq!(updated.price, 12.5);
    }

    #[tokio::test]
    async fn approving_unknown_product_is_not_found() {
        let h = harness();
        let err = h.catalog.approve(UserId::new(), ProductId::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("product")));
    }

    #[tokio::test]
    async fn update_racing_a_delete_does_not_recreate_the_product() {
        let catalog = Catalog::new(Arc::new(DeletedMidUpdate::default()));
        let owner = VendorId::new();
        let product = catalog.create(owner, hammer()).await.unwrap();

        let patch = ProductPatch {
            name: Some("Sledgehammer".to_string()),
            ..Default::default()
        };
        let err = catalog.update_owned(owner, product.id, patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("product")));
        assert!(catalog.list_mine(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_from_listing() {
        let h = harness();
        let owner = VendorId::new();
        let product = h.catalog.create(owner, hammer()).await.unwrap();
        h.catalog.delete_owned(owner, product.id).await.unwrap();
        assert!(h.catalog.list_mine(owner).await.unwrap().is_empty());
        assert!(h.catalog.delete_owned(owner, product.id).await.is_err());
    }
}
