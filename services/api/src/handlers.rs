//! Axum Handlers
//!
//! This module contains the logic for handling HTTP requests for the chat
//! endpoint and the static UI page. It uses `utoipa` doc comments to generate
//! OpenAPI documentation.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::{
    models::{ChatRequest, ChatResponse, ErrorResponse},
    sessions::DEFAULT_SESSION,
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

/// Serves the static chat UI.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Answer a user query, gated by syllabus relevance.
#[utoipa::path(
    post,
    path = "/get",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Tutor reply, redirect, or refusal", body = ChatResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(
        ("x-session-id" = Option<String>, Header, description = "Conversation to continue; omit to use the shared default session")
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session_id = match headers.get("x-session-id") {
        Some(value) => value
            .to_str()
            .map_err(|_| ApiError::BadRequest("x-session-id header must be valid UTF-8".to_string()))?
            .to_string(),
        None => DEFAULT_SESSION.to_string(),
    };

    let slot = state.sessions.get_or_create(&session_id).await;
    let mut session = slot.lock().await;

    let response = state.tutor.chat(&mut session, &payload.msg).await?;

    Ok(Json(ChatResponse { response }))
}
