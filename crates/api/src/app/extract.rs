//! Request extractors that reject with [`ApiError`] instead of axum's defaults.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::{Json, async_trait};
use serde::de::DeserializeOwned;

use vendorhub_core::ProductId;

use super::errors::ApiError;

/// JSON body extractor. Any malformed or mistyped body is a 400 `validation_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::validation(rejection.body_text())
}

/// Parse a product id from a path segment.
pub fn product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse::<ProductId>().map_err(ApiError::from)
}
