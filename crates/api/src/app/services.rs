//! Service wiring: one `AppServices` per process, shared through an `Extension`.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use vendorhub_auth::Hs256Tokens;
use vendorhub_infra::services::{Catalog, SessionResolver, UserAccounts, VendorAccounts};
use vendorhub_infra::{AppConfig, InMemorySessionStore, SessionStore, Stores};

pub struct AppServices {
    pub accounts: VendorAccounts,
    pub users: UserAccounts,
    pub catalog: Catalog,
    pub resolver: SessionResolver,
    pub sessions: Arc<dyn SessionStore>,
    pub session_cookie: String,
    pub session_ttl: Duration,
}

pub fn build_services(config: &AppConfig, stores: &Stores) -> AppServices {
    let tokens = Arc::new(Hs256Tokens::new(config.jwt_secret.as_bytes(), config.token_ttl()));
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(config.session_ttl()));

    AppServices {
        accounts: VendorAccounts::new(stores.vendors.clone(), tokens.clone(), config.bcrypt_cost),
        users: UserAccounts::new(stores.users.clone(), tokens.clone(), config.bcrypt_cost),
        catalog: Catalog::new(stores.products.clone()),
        resolver: SessionResolver::new(
            tokens,
            stores.vendors.clone(),
            stores.users.clone(),
            sessions.clone(),
        ),
        sessions,
        session_cookie: config.session_cookie.clone(),
        session_ttl: config.session_ttl(),
    }
}

/// Create the configured admin account if it does not exist yet.
pub async fn seed_admin(services: &AppServices, config: &AppConfig) -> anyhow::Result<()> {
    if let Some((email, password)) = config.admin_seed() {
        let admin = services
            .users
            .seed_admin(&config.admin_name, email, password)
            .await
            .map_err(|e| anyhow::anyhow!("failed to seed admin account: {e}"))?;
        info!(user_id = %admin.id, "admin account ready");
    }
    Ok(())
}
