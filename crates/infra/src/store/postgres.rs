//! Postgres-backed stores.
//!
//! Queries are checked at runtime (no `query!` macros) so the crate builds
//! without a live database. Rows are mapped by hand through `try_get`.
//!
//! Vendor tokens live in their own table keyed by `(vendor_id, token)`, so
//! appending and revoking are single-row statements and never race with a
//! concurrent profile save.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use vendorhub_auth::UserAccount;
use vendorhub_catalog::{Address, Vendor, VendorProduct};
use vendorhub_core::{ProductId, UserId, VendorId};

use super::{ProductStore, StoreError, UserStore, VendorStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS vendors (
    id              UUID PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    password_hash   TEXT NOT NULL,
    company_name    TEXT NOT NULL,
    business_type   TEXT NOT NULL,
    address         JSONB NOT NULL DEFAULT '{}'::jsonb,
    phone           TEXT,
    website         TEXT,
    tax_id          TEXT,
    approved        BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL,
    updated_at      TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS vendor_tokens (
    vendor_id   UUID NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,
    token       TEXT NOT NULL,
    issued_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (vendor_id, token)
);

CREATE TABLE IF NOT EXISTS vendor_products (
    id          UUID PRIMARY KEY,
    vendor_id   UUID NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price       DOUBLE PRECISION NOT NULL,
    category    TEXT NOT NULL,
    stock       BIGINT NOT NULL DEFAULT 0,
    images      JSONB NOT NULL DEFAULT '[]'::jsonb,
    attributes  JSONB NOT NULL DEFAULT '{}'::jsonb,
    approved    BOOLEAN NOT NULL DEFAULT FALSE,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS vendor_products_owner_idx
    ON vendor_products (vendor_id, created_at DESC);

CREATE TABLE IF NOT EXISTS users (
    id              UUID PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    password_hash   TEXT NOT NULL,
    is_admin        BOOLEAN NOT NULL DEFAULT FALSE,
    created_at      TIMESTAMPTZ NOT NULL
);
"#;

/// Open a pool and create any missing tables.
pub async fn connect(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;

    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .map_err(|e| map_sqlx_error("bootstrap_schema", e))?;

    tracing::info!("postgres schema ready");
    Ok(pool)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            // 23505: unique violation
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Duplicate("email".to_string())
            } else {
                StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
            }
        }
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

fn decode_error(what: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("failed to decode {what} row: {err}"))
}

// Row mapping

fn vendor_from_row(row: &PgRow, tokens: Vec<String>) -> Result<Vendor, StoreError> {
    let business_type: String = row.try_get("business_type").map_err(|e| decode_error("vendor", e))?;
    let address: Json<Address> = row.try_get("address").map_err(|e| decode_error("vendor", e))?;
    let id: Uuid = row.try_get("id").map_err(|e| decode_error("vendor", e))?;

    Ok(Vendor {
        id: VendorId::from_uuid(id),
        name: row.try_get("name").map_err(|e| decode_error("vendor", e))?,
        email: row.try_get("email").map_err(|e| decode_error("vendor", e))?,
        password_hash: row.try_get("password_hash").map_err(|e| decode_error("vendor", e))?,
        company_name: row.try_get("company_name").map_err(|e| decode_error("vendor", e))?,
        business_type: business_type.parse().map_err(|e| decode_error("vendor", e))?,
        address: address.0,
        phone: row.try_get("phone").map_err(|e| decode_error("vendor", e))?,
        website: row.try_get("website").map_err(|e| decode_error("vendor", e))?,
        tax_id: row.try_get("tax_id").map_err(|e| decode_error("vendor", e))?,
        approved: row.try_get("approved").map_err(|e| decode_error("vendor", e))?,
        tokens,
        created_at: row.try_get("created_at").map_err(|e| decode_error("vendor", e))?,
        updated_at: row.try_get("updated_at").map_err(|e| decode_error("vendor", e))?,
    })
}

fn product_from_row(row: &PgRow) -> Result<VendorProduct, StoreError> {
    let id: Uuid = row.try_get("id").map_err(|e| decode_error("product", e))?;
    let vendor_id: Uuid = row.try_get("vendor_id").map_err(|e| decode_error("product", e))?;
    let stock: i64 = row.try_get("stock").map_err(|e| decode_error("product", e))?;
    let images: Json<Vec<String>> = row.try_get("images").map_err(|e| decode_error("product", e))?;
    let attributes: Json<BTreeMap<String, String>> =
        row.try_get("attributes").map_err(|e| decode_error("product", e))?;

    Ok(VendorProduct {
        id: ProductId::from_uuid(id),
        vendor: VendorId::from_uuid(vendor_id),
        name: row.try_get("name").map_err(|e| decode_error("product", e))?,
        description: row.try_get("description").map_err(|e| decode_error("product", e))?,
        price: row.try_get("price").map_err(|e| decode_error("product", e))?,
        category: row.try_get("category").map_err(|e| decode_error("product", e))?,
        stock: u32::try_from(stock).map_err(|e| decode_error("product", e))?,
        images: images.0,
        attributes: attributes.0,
        approved: row.try_get("approved").map_err(|e| decode_error("product", e))?,
        created_at: row.try_get("created_at").map_err(|e| decode_error("product", e))?,
        updated_at: row.try_get("updated_at").map_err(|e| decode_error("product", e))?,
    })
}

fn user_from_row(row: &PgRow) -> Result<UserAccount, StoreError> {
    let id: Uuid = row.try_get("id").map_err(|e| decode_error("user", e))?;
    Ok(UserAccount {
        id: UserId::from_uuid(id),
        name: row.try_get("name").map_err(|e| decode_error("user", e))?,
        email: row.try_get("email").map_err(|e| decode_error("user", e))?,
        password_hash: row.try_get("password_hash").map_err(|e| decode_error("user", e))?,
        is_admin: row.try_get("is_admin").map_err(|e| decode_error("user", e))?,
        created_at: row.try_get("created_at").map_err(|e| decode_error("user", e))?,
    })
}

const VENDOR_COLUMNS: &str = "v.id, v.name, v.email, v.password_hash, v.company_name, v.business_type, \
     v.address, v.phone, v.website, v.tax_id, v.approved, v.created_at, v.updated_at";

const PRODUCT_COLUMNS: &str = "id, vendor_id, name, description, price, category, stock, images, \
     attributes, approved, created_at, updated_at";

// Vendors

#[derive(Debug, Clone)]
pub struct PostgresVendorStore {
    pool: Arc<PgPool>,
}

impl PostgresVendorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    async fn tokens_of(&self, id: Uuid) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT token FROM vendor_tokens WHERE vendor_id = $1 ORDER BY issued_at ASC")
            .bind(id)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("load_tokens", e))?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("token").map_err(|e| decode_error("token", e)))
            .collect()
    }

    async fn hydrate(&self, row: Option<PgRow>) -> Result<Option<Vendor>, StoreError> {
        match row {
            Some(row) => {
                let id: Uuid = row.try_get("id").map_err(|e| decode_error("vendor", e))?;
                let tokens = self.tokens_of(id).await?;
                vendor_from_row(&row, tokens).map(Some)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl VendorStore for PostgresVendorStore {
    #[instrument(skip_all, fields(vendor_id = %vendor.id), err)]
    async fn insert(&self, vendor: Vendor) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_vendor", e))?;

        sqlx::query(
            r#"
            INSERT INTO vendors (
                id, name, email, password_hash, company_name, business_type,
                address, phone, website, tax_id, approved, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(vendor.id.as_uuid())
        .bind(&vendor.name)
        .bind(&vendor.email)
        .bind(&vendor.password_hash)
        .bind(&vendor.company_name)
        .bind(vendor.business_type.as_str())
        .bind(Json(&vendor.address))
        .bind(&vendor.phone)
        .bind(&vendor.website)
        .bind(&vendor.tax_id)
        .bind(vendor.approved)
        .bind(vendor.created_at)
        .bind(vendor.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_vendor", e))?;

        for token in &vendor.tokens {
            sqlx::query("INSERT INTO vendor_tokens (vendor_id, token) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(vendor.id.as_uuid())
                .bind(token)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_vendor_token", e))?;
        }

        tx.commit().await.map_err(|e| map_sqlx_error("insert_vendor", e))
    }

    async fn get(&self, id: VendorId) -> Result<Option<Vendor>, StoreError> {
        let row = sqlx::query(&format!("SELECT {VENDOR_COLUMNS} FROM vendors v WHERE v.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_vendor", e))?;
        self.hydrate(row).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Vendor>, StoreError> {
        let row = sqlx::query(&format!("SELECT {VENDOR_COLUMNS} FROM vendors v WHERE v.email = $1"))
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_vendor_by_email", e))?;
        self.hydrate(row).await
    }

    async fn find_by_token(
        &self,
        id: VendorId,
        token: &str,
    ) -> Result<Option<Vendor>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors v \
             JOIN vendor_tokens t ON t.vendor_id = v.id \
             WHERE v.id = $1 AND t.token = $2"
        ))
        .bind(id.as_uuid())
        .bind(token)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_vendor_by_token", e))?;
        self.hydrate(row).await
    }

    #[instrument(skip_all, fields(vendor_id = %vendor.id), err)]
    async fn save(&self, vendor: &Vendor) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE vendors SET
                name = $2,
                email = $3,
                password_hash = $4,
                company_name = $5,
                business_type = $6,
                address = $7,
                phone = $8,
                website = $9,
                tax_id = $10,
                approved = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(vendor.id.as_uuid())
        .bind(&vendor.name)
        .bind(&vendor.email)
        .bind(&vendor.password_hash)
        .bind(&vendor.company_name)
        .bind(vendor.business_type.as_str())
        .bind(Json(&vendor.address))
        .bind(&vendor.phone)
        .bind(&vendor.website)
        .bind(&vendor.tax_id)
        .bind(vendor.approved)
        .bind(vendor.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_vendor", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!("vendor {} does not exist", vendor.id)));
        }
        Ok(())
    }

    async fn push_token(&self, id: VendorId, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO vendor_tokens (vendor_id, token)
            SELECT id, $2 FROM vendors WHERE id = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id.as_uuid())
        .bind(token)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("push_token", e))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // Zero rows means either the vendor is gone or the token was already active.
        Ok(self.get(id).await?.is_some())
    }

    async fn remove_token(&self, id: VendorId, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM vendor_tokens WHERE vendor_id = $1 AND token = $2")
            .bind(id.as_uuid())
            .bind(token)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_token", e))?;
        Ok(result.rows_affected() > 0)
    }
}

// Products

#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip_all, fields(product_id = %product.id), err)]
    async fn insert(&self, product: VendorProduct) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO vendor_products (
                id, vendor_id, name, description, price, category, stock,
                images, attributes, approved, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.vendor.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(i64::from(product.stock))
        .bind(Json(&product.images))
        .bind(Json(&product.attributes))
        .bind(product.approved)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;
        Ok(())
    }

    async fn find_owned(
        &self,
        id: ProductId,
        vendor: VendorId,
    ) -> Result<Option<VendorProduct>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM vendor_products WHERE id = $1 AND vendor_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(vendor.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_owned_product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_by_vendor(&self, vendor: VendorId) -> Result<Vec<VendorProduct>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM vendor_products WHERE vendor_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(vendor.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;
        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip_all, fields(product_id = %product.id), err)]
    async fn save(&self, product: &VendorProduct) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE vendor_products SET
                name = $3,
                description = $4,
                price = $5,
                category = $6,
                stock = $7,
                images = $8,
                attributes = $9,
                approved = $10,
                updated_at = $11
            WHERE id = $1 AND vendor_id = $2
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.vendor.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(i64::from(product.stock))
        .bind(Json(&product.images))
        .bind(Json(&product.attributes))
        .bind(product.approved)
        .bind(product.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_product", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_owned(&self, id: ProductId, vendor: VendorId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM vendor_products WHERE id = $1 AND vendor_id = $2")
            .bind(id.as_uuid())
            .bind(vendor.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn approve(
        &self,
        id: ProductId,
        now: DateTime<Utc>,
    ) -> Result<Option<VendorProduct>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE vendor_products SET approved = TRUE, updated_at = $2 WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(now)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("approve_product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }
}

// Users

#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: Arc<PgPool>,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, user: UserAccount) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, is_admin, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, is_admin, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_user", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, is_admin, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_email", e))?;
        row.as_ref().map(user_from_row).transpose()
    }
}
