use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::AppState;
use crate::error::ApiError;

/// JSON request body whose failures render as `ApiError`.
///
/// A body that does not deserialize is still checked for the master key, so
/// a bad key reports 403 ahead of the 400 for the body itself. The
/// content type is not enforced.
pub struct ChatJson<T>(pub T);

#[derive(Deserialize)]
struct KeyOnly {
    key: Option<String>,
}

impl<T> FromRequest<AppState> for ChatJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        match Json::<T>::from_bytes(&bytes) {
            Ok(Json(value)) => Ok(ChatJson(value)),
            Err(rejection) => {
                let key = serde_json::from_slice::<KeyOnly>(&bytes)
                    .ok()
                    .and_then(|k| k.key);
                state.authenticate(key.as_deref())?;
                Err(ApiError::BadRequest(rejection.body_text()))
            }
        }
    }
}
