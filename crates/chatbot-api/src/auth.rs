use axum::{Json, extract::State};

use chatbot_types::api::{LoginRequest, RegisterRequest, StatusResponse};

use crate::error::ApiError;
use crate::extract::ChatJson;
use crate::{AppState, required, run_blocking};

pub async fn register(
    State(store): State<AppState>,
    ChatJson(req): ChatJson<RegisterRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    store.authenticate(req.key.as_deref())?;
    let user_id = required(req.uid, "uid")?;
    let password = required(req.pass, "pass")?;

    let key = req.key;
    run_blocking(move || store.register_user(&user_id, &password, key.as_deref())).await?;

    Ok(Json(StatusResponse::ok("User created successfully")))
}

pub async fn login(
    State(store): State<AppState>,
    ChatJson(req): ChatJson<LoginRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    store.authenticate(req.key.as_deref())?;
    let user_id = required(req.uid, "uid")?;
    let password = required(req.pass, "pass")?;

    let key = req.key;
    let user = run_blocking(move || store.login_user(&user_id, &password, key.as_deref())).await?;

    Ok(Json(StatusResponse::ok("Login successful").with_user(user)))
}
