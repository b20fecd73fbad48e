use anyhow::Context;
use tracing::{info, warn};

use vendorhub_api::{app, shutdown};
use vendorhub_infra::{AppConfig, Stores};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    vendorhub_observability::init_with(config.log_format);

    if config.uses_dev_secret() {
        warn!("jwt_secret not set; using insecure dev default");
    }

    let stores = open_stores(&config).await?;
    let app = app::build_app(&config, &stores).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(
        addr = %listener.local_addr()?,
        backend = stores.backend_name(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .context("server error")?;

    stores.close().await;
    Ok(())
}

async fn open_stores(config: &AppConfig) -> anyhow::Result<Stores> {
    #[cfg(feature = "postgres")]
    if let Some(url) = &config.database_url {
        return Stores::connect_postgres(url)
            .await
            .context("failed to open postgres store");
    }

    #[cfg(not(feature = "postgres"))]
    if config.database_url.is_some() {
        warn!("database_url is set but this build has no postgres support; using in-memory stores");
    }

    Ok(Stores::in_memory())
}
