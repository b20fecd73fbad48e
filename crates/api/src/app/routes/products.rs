use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use serde_json::{Value, json};

use vendorhub_catalog::{NewProduct, ProductPatch};

use crate::app::dto::{ProductApproval, ProductCreated, ProductUpdated};
use crate::app::errors::ApiError;
use crate::app::extract::{ApiJson, product_id};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;
use crate::middleware::{self, GateState};

pub fn router(gates: GateState) -> Router {
    let vendor_routes = Router::new()
        .route("/", post(create_product))
        .route("/mine", get(list_my_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route_layer(from_fn_with_state(gates.clone(), middleware::vendor_auth));

    // Layers run outermost-last: `protect` resolves the user, then `admin` checks the flag.
    let admin_routes = Router::new()
        .route("/approve/:id", patch(approve_product))
        .route_layer(from_fn(middleware::admin))
        .route_layer(from_fn_with_state(gates, middleware::protect));

    vendor_routes.merge(admin_routes)
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    body: Result<ApiJson<NewProduct>, ApiError>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (vendor_id, _) = authz::bearer_vendor(&ctx)?;
    let ApiJson(input) = body.map_err(|e| e.context("Failed to create product"))?;

    let product = services
        .catalog
        .create(vendor_id, input)
        .await
        .map_err(|e| ApiError::from(e).context("Failed to create product"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "product": ProductCreated::from(&product),
        })),
    ))
}

pub async fn list_my_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> Result<Json<Value>, ApiError> {
    let (vendor_id, _) = authz::bearer_vendor(&ctx)?;
    let products = services.catalog.list_mine(vendor_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": products.len(),
        "products": products,
    })))
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (vendor_id, _) = authz::bearer_vendor(&ctx)?;
    let product = services.catalog.get_owned(vendor_id, product_id(&id)?).await?;
    Ok(Json(json!({
        "success": true,
        "product": product,
    })))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<ApiJson<ProductPatch>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let (vendor_id, _) = authz::bearer_vendor(&ctx)?;
    let id = product_id(&id)?;
    let ApiJson(patch) = body.map_err(|e| e.context("Failed to update product"))?;

    let product = services
        .catalog
        .update_owned(vendor_id, id, patch)
        .await
        .map_err(|e| ApiError::from(e).context("Failed to update product"))?;

    Ok(Json(json!({
        "success": true,
        "product": ProductUpdated::from(&product),
    })))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (vendor_id, _) = authz::bearer_vendor(&ctx)?;
    services.catalog.delete_owned(vendor_id, product_id(&id)?).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Product deleted successfully",
    })))
}

pub async fn approve_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let admin_id = authz::admin_user(&ctx)?;
    let id = product_id(&id).map_err(|e| e.context("Failed to approve product"))?;
    let product = services.catalog.approve(admin_id, id).await?;
    Ok(Json(json!({
        "success": true,
        "product": ProductApproval::from(&product),
    })))
}
