use std::sync::Arc;

use axum::{Extension, Json, Router, routing::post};
use serde_json::{Value, json};

use crate::app::dto::{LoginRequest, UserSummary};
use crate::app::errors::ApiError;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/login", post(login))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (user, token) = services.users.login(&body.email, &body.password).await?;
    Ok(Json(json!({
        "success": true,
        "user": UserSummary::from(&user),
        "token": token,
    })))
}
