use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// A `Json<T>` wrapper that turns every body rejection into `AppError::Validation`,
/// so malformed requests still get the structured `{code, message}` body.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let message = match &rejection {
                    JsonRejection::MissingJsonContentType(_) => {
                        "Expected a request body with `Content-Type: application/json`".to_string()
                    }
                    JsonRejection::JsonSyntaxError(_) => {
                        format!("Malformed JSON: {}", rejection.body_text())
                    }
                    _ => rejection.body_text(),
                };
                AppError::Validation(message)
            })?;
        Ok(AppJson(value))
    }
}
