use axum::Router;

use crate::middleware::GateState;

pub mod products;
pub mod system;
pub mod users;
pub mod vendors;

/// Router for every gated area. Each area attaches its own gates.
pub fn router(gates: GateState) -> Router {
    Router::new()
        .nest("/vendors", vendors::router(gates.clone()))
        .nest("/products", products::router(gates))
        .nest("/users", users::router())
}
