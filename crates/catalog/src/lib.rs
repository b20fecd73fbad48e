//! Vendor catalog domain module.
//!
//! Business rules for vendor accounts and their product listings, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod vendor;

pub use product::{NewProduct, ProductPatch, VendorProduct};
pub use vendor::{Address, BusinessType, Vendor, VendorRegistration};
