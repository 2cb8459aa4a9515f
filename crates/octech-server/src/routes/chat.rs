use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use octech_core::{ChatError, ChatSession, ChatSnapshot};
use octech_provider::CompletionMessage;
use octech_schema::ContactInfo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct HandoffBody {
    pub accept: bool,
}

#[derive(Debug, Deserialize)]
pub struct AssistantBody {
    pub messages: Vec<CompletionMessage>,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub reply: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(close_session))
        .route("/sessions/{id}/messages", post(send_message))
        .route("/sessions/{id}/handoff", post(answer_handoff))
        .route("/sessions/{id}/contact", post(submit_contact))
        .route("/assistant", post(assistant_reply))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<ChatSnapshot>) {
    let session = state.chats.create().await;
    (StatusCode::CREATED, Json(session.snapshot().await))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatSnapshot>, StatusCode> {
    let session = find_session(&state, &id).await?;
    Ok(Json(session.snapshot().await))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageBody>,
) -> Result<Json<ChatSnapshot>, StatusCode> {
    let session = find_session(&state, &id).await?;
    session.send(&body.text).await.map_err(chat_error_status)?;
    Ok(Json(session.snapshot().await))
}

pub async fn answer_handoff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<HandoffBody>,
) -> Result<Json<ChatSnapshot>, StatusCode> {
    let session = find_session(&state, &id).await?;
    let answered = if body.accept {
        session.accept_handoff().await
    } else {
        session.decline_handoff().await
    };
    answered.map_err(chat_error_status)?;
    Ok(Json(session.snapshot().await))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(info): Json<ContactInfo>,
) -> Result<Json<ChatSnapshot>, StatusCode> {
    let session = find_session(&state, &id).await?;
    session
        .submit_contact_info(&info)
        .await
        .map_err(chat_error_status)?;
    Ok(Json(session.snapshot().await))
}

pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if state.chats.close(&id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

pub async fn assistant_reply(
    State(state): State<AppState>,
    Json(body): Json<AssistantBody>,
) -> Json<AssistantReply> {
    let reply = state.assistant.generate_reply(&body.messages).await;
    Json(AssistantReply { reply })
}

async fn find_session(state: &AppState, id: &Uuid) -> Result<Arc<ChatSession>, StatusCode> {
    state.chats.get(id).await.ok_or(StatusCode::NOT_FOUND)
}

fn chat_error_status(error: ChatError) -> StatusCode {
    match error {
        ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
        ChatError::NoHandoffOffered | ChatError::NotCollectingContactInfo => StatusCode::CONFLICT,
        ChatError::SessionClosed => StatusCode::NOT_FOUND,
    }
}
