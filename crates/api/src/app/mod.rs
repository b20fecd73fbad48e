//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and service wiring, admin seed
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request bodies and response projections
//! - `extract.rs`: extractors that fail with `ApiError`
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use vendorhub_infra::{AppConfig, Stores};

use crate::middleware::GateState;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// The caller owns `stores` and is responsible for closing them once the
/// server has stopped.
pub async fn build_app(config: &AppConfig, stores: &Stores) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config, stores));
    services::seed_admin(&services, config).await?;

    let gates = GateState {
        resolver: services.resolver.clone(),
        session_cookie: services.session_cookie.clone(),
    };

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(gates))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services)),
        ))
}
