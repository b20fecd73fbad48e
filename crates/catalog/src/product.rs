//! Vendor product listings and the approval flag.
//!
//! # Invariants
//! - A listing is owned by exactly one vendor, fixed at creation.
//! - `approved` starts `false` and every vendor-authored mutation resets it to
//!   `false`. Only [`VendorProduct::approve`] raises it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendorhub_core::{DomainError, DomainResult, Entity, ProductId, VendorId};

/// Create payload.
///
/// Ownership and approval are not part of the payload: any `vendor` or
/// `approved` key in the request body is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Partial update payload.
///
/// Only *truthy* values overwrite the stored listing: non-empty strings,
/// non-zero numbers, and any `images`/`attributes` value that is present
/// (collections count as truthy even when empty). Everything else keeps the
/// stored value, so a price or stock of `0` cannot be set through a patch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub images: Option<Vec<String>>,
    pub attributes: Option<BTreeMap<String, String>>,
}

/// Persisted listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProduct {
    pub id: ProductId,
    pub vendor: VendorId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
    pub images: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VendorProduct {
    /// Build a new listing owned by `vendor`. Always starts unapproved.
    pub fn create(vendor: VendorId, input: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        let product = Self {
            id: ProductId::new(),
            vendor,
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            stock: input.stock,
            images: input.images,
            attributes: input.attributes,
            approved: false,
            created_at: now,
            updated_at: now,
        };
        product.validate()?;
        Ok(product)
    }

    pub fn is_owned_by(&self, vendor: VendorId) -> bool {
        self.vendor == vendor
    }

    /// Apply a vendor-authored patch and reset approval.
    ///
    /// On validation failure the listing is left untouched.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();

        if let Some(name) = truthy_string(patch.name) {
            next.name = name;
        }
        if let Some(description) = truthy_string(patch.description) {
            next.description = description;
        }
        if let Some(price) = patch.price.filter(|p| *p != 0.0) {
            next.price = price;
        }
        if let Some(category) = truthy_string(patch.category) {
            next.category = category;
        }
        if let Some(stock) = patch.stock.filter(|s| *s != 0) {
            next.stock = stock;
        }
        if let Some(images) = patch.images {
            next.images = images;
        }
        if let Some(attributes) = patch.attributes {
            next.attributes = attributes;
        }

        next.approved = false;
        next.updated_at = now;
        next.validate()?;

        *self = next;
        Ok(())
    }

    /// Admin approval. No re-validation of content.
    pub fn approve(&mut self, now: DateTime<Utc>) {
        self.approved = true;
        self.updated_at = now;
    }

    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        if self.images.iter().any(|i| i.trim().is_empty()) {
            return Err(DomainError::validation("images must not contain empty entries"));
        }
        Ok(())
    }
}

impl Entity for VendorProduct {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

fn truthy_string(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
