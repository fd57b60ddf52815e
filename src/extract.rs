use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use garde::Validate;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::shared::AppError;

/// JSON body that has been deserialized and passed its `garde` rules.
/// Either failure becomes a 400 with the usual `{"error": ...}` body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    <T as Validate>::Context: Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                debug!(error = %rejection.body_text(), "Rejected request body");
                AppError::BadRequest(rejection.body_text())
            })?;

        value.validate().map_err(|report| {
            debug!(error = %report, "Request body failed validation");
            AppError::BadRequest(report.to_string())
        })?;

        Ok(Self(value))
    }
}

/// Path parameters, with parse failures (e.g. a non-numeric id) reported as 400
pub struct ParsedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ParsedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}
