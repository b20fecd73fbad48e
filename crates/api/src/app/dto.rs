//! Request bodies and the reduced response projections.

use serde::{Deserialize, Serialize};

use vendorhub_auth::UserAccount;
use vendorhub_catalog::{Vendor, VendorProduct};
use vendorhub_core::{ProductId, UserId, VendorId};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// What login and registration echo back about a vendor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    pub id: VendorId,
    pub name: String,
    pub email: String,
    pub company_name: String,
}

impl From<&Vendor> for VendorSummary {
    fn from(v: &Vendor) -> Self {
        Self {
            id: v.id,
            name: v.name.clone(),
            email: v.email.clone(),
            company_name: v.company_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&UserAccount> for UserSummary {
    fn from(u: &UserAccount) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            is_admin: u.is_admin,
        }
    }
}

/// Projection returned after create.
#[derive(Debug, Serialize)]
pub struct ProductCreated {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
    pub approved: bool,
}

impl From<&VendorProduct> for ProductCreated {
    fn from(p: &VendorProduct) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            category: p.category.clone(),
            stock: p.stock,
            approved: p.approved,
        }
    }
}

/// Projection returned after update (no stock).
#[derive(Debug, Serialize)]
pub struct ProductUpdated {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub approved: bool,
}

impl From<&VendorProduct> for ProductUpdated {
    fn from(p: &VendorProduct) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            category: p.category.clone(),
            approved: p.approved,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductApproval {
    pub id: ProductId,
    pub name: String,
    pub approved: bool,
}

impl From<&VendorProduct> for ProductApproval {
    fn from(p: &VendorProduct) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            approved: p.approved,
        }
    }
}
