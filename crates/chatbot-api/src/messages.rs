use axum::{Json, extract::State};
use tracing::debug;
use uuid::Uuid;

use chatbot_types::api::{
    DeleteChatRequest, RenameChatRequest, RetrieveRequest, StatusResponse, UploadRequest,
};

use crate::error::ApiError;
use crate::extract::ChatJson;
use crate::{AppState, required, run_blocking};

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Keep the client's conversation id, or start a new conversation when the
/// client has none yet.
fn resolve_chat_uid(chat_uid: String) -> String {
    if chat_uid.is_empty() || chat_uid == "null" {
        let fresh = Uuid::new_v4().to_string();
        debug!("Started conversation {}", fresh);
        fresh
    } else {
        chat_uid
    }
}

pub async fn upload_message(
    State(store): State<AppState>,
    ChatJson(req): ChatJson<UploadRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    store.authenticate(req.key.as_deref())?;
    let user_id = required(req.uid, "uid")?;

    let question = trimmed(req.question);
    let answer = trimmed(req.answer);
    let video = trimmed(req.video);
    let chat_id = trimmed(req.cid);
    let chat_uid = resolve_chat_uid(trimmed(req.chat_uid));

    let key = req.key;
    let chat_uid = run_blocking(move || {
        store.upload_message(&user_id, &question, &answer, &video, &chat_id, &chat_uid, key.as_deref())
    })
    .await?;

    Ok(Json(StatusResponse::ok("Query uploaded successfully").with_chat_uid(chat_uid)))
}

pub async fn list_messages(
    State(store): State<AppState>,
    ChatJson(req): ChatJson<RetrieveRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    store.authenticate(req.key.as_deref())?;
    let user_id = required(req.uid, "uid")?;

    let key = req.key;
    let conversations = run_blocking(move || store.list_messages(&user_id, key.as_deref())).await?;

    Ok(Json(StatusResponse::success().with_conversations(conversations)))
}

pub async fn delete_chat(
    State(store): State<AppState>,
    ChatJson(req): ChatJson<DeleteChatRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    store.authenticate(req.key.as_deref())?;
    let user_id = required(req.uid, "uid")?;
    let chat_uid = required(req.chat, "chat")?;

    let key = req.key;
    run_blocking(move || store.delete_chat(&user_id, &chat_uid, key.as_deref())).await?;

    Ok(Json(StatusResponse::ok("Successfully deleted")))
}

pub async fn rename_chat(
    State(store): State<AppState>,
    ChatJson(req): ChatJson<RenameChatRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    store.authenticate(req.key.as_deref())?;
    let user_id = required(req.uid, "uid")?;
    let chat_uid = required(req.c_uid, "c_uid")?;
    let title = required(req.updated_title, "updated_title")?;

    let key = req.key;
    run_blocking(move || store.rename_chat(&user_id, &chat_uid, &title, key.as_deref())).await?;

    Ok(Json(StatusResponse::ok("Updated name successfully")))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode};
    use serde_json::{Value, json};

    use super::resolve_chat_uid;
    use crate::test_support::{MASTER, app, post_json};

    async fn app_with_alice() -> Router {
        let app = app();
        let (code, _) = post_json(
            &app,
            "/api/chatbot/register/",
            json!({"uid": "alice", "pass": "pw", "key": MASTER}),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        app
    }

    async fn upload(app: &Router, question: &str, cid: &str, chat_uid: &str) -> Value {
        let (code, body) = post_json(
            app,
            "/api/chatbot/upload/",
            json!({
                "uid": "alice",
                "question": question,
                "answer": "  some answer  ",
                "video": "",
                "cid": cid,
                "chat_uid": chat_uid,
                "key": MASTER,
            }),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        body
    }

    async fn conversations(app: &Router) -> Vec<Value> {
        let (code, body) = post_json(app, "/api/chatbot/retrieve/", json!({"uid": "alice", "key": MASTER})).await;
        assert_eq!(code, StatusCode::OK);
        body["conversations"].as_array().cloned().unwrap_or_default()
    }

    #[test]
    fn null_chat_uid_gets_replaced() {
        assert_ne!(resolve_chat_uid("null".into()), "null");
        assert_eq!(resolve_chat_uid(String::new()).len(), 36);
        assert_eq!(resolve_chat_uid("c1".into()), "c1");
    }

    #[tokio::test]
    async fn upload_generates_and_keeps_chat_uid() {
        let app = app_with_alice().await;

        let first = upload(&app, "What is an index fund?", "Investing", "null").await;
        let chat_uid = first["chat_uid"].as_str().unwrap().to_string();
        assert_ne!(chat_uid, "null");

        let second = upload(&app, "Is it risky?", "Investing", &chat_uid).await;
        assert_eq!(second["chat_uid"], chat_uid.as_str());

        let rows = conversations(&app).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["question"], "What is an index fund?");
        assert_eq!(rows[0]["answer"], "some answer");
        assert_eq!(rows[1]["chat_uid"], chat_uid.as_str());
    }

    #[tokio::test]
    async fn rename_then_delete() {
        let app = app_with_alice().await;
        upload(&app, "q1", "Untitled", "c1").await;
        upload(&app, "q2", "Untitled", "c2").await;

        let (code, _) = post_json(
            &app,
            "/api/chatbot/rename/",
            json!({"uid": "alice", "c_uid": "c1", "updated_title": "Taxes", "key": MASTER}),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        let titles: Vec<_> = conversations(&app).await.iter().map(|r| r["chat_id"].clone()).collect();
        assert_eq!(titles, vec![json!("Taxes"), json!("Untitled")]);

        for _ in 0..2 {
            let (code, body) = post_json(
                &app,
                "/api/chatbot/delete/",
                json!({"uid": "alice", "chat": "c1", "key": MASTER}),
            )
            .await;
            assert_eq!(code, StatusCode::OK);
            assert_eq!(body["status"], 200);
        }
        let rows = conversations(&app).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["chat_uid"], "c2");
    }

    #[tokio::test]
    async fn storage_failure_is_reported_with_details() {
        let app = app();
        let (code, body) = post_json(
            &app,
            "/api/chatbot/upload/",
            json!({"uid": "ghost", "question": "q", "chat_uid": "c1", "key": MASTER}),
        )
        .await;
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert_eq!(body["error"], "Error uploading query");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn retrieve_requires_key() {
        let app = app_with_alice().await;
        let (code, body) = post_json(&app, "/api/chatbot/retrieve/", json!({"uid": "alice"})).await;
        assert_eq!(code, StatusCode::FORBIDDEN);
        assert_eq!(body["status"], 403);
    }
}
