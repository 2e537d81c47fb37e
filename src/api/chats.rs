// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chat endpoints. All of them act on behalf of the authenticated caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::{ApiError, ApiJson},
    models::{
        ChatListResponse, ChatMessageResponse, ChatResponse, ChatSummary, CreateChatRequest,
        PostMessageRequest,
    },
    services::chats,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/chats",
    tag = "Chats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's chats, most recent first", body = ChatListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_chats(
    Auth(claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<ChatListResponse>, ApiError> {
    let chats: Vec<ChatSummary> = chats::list_chats(state.chats.as_ref(), &claims)
        .await?
        .into_iter()
        .map(ChatSummary::from)
        .collect();

    let total = chats.len();
    Ok(Json(ChatListResponse { chats, total }))
}

#[utoipa::path(
    post,
    path = "/v1/chats",
    tag = "Chats",
    security(("bearer_auth" = [])),
    request_body = CreateChatRequest,
    responses(
        (status = 201, description = "Chat created", body = ChatResponse),
        (status = 400, description = "Invalid title"),
        (status = 401, description = "Not authenticated or account deleted")
    )
)]
pub async fn create_chat(
    Auth(claims): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), ApiError> {
    let chat =
        chats::create_chat(state.users.as_ref(), state.chats.as_ref(), &claims, request).await?;
    Ok((StatusCode::CREATED, Json(chat.into())))
}

/// Get a chat with its messages. Owners and admins only.
#[utoipa::path(
    get,
    path = "/v1/chats/{chat_id}",
    tag = "Chats",
    security(("bearer_auth" = [])),
    params(
        ("chat_id" = String, Path, description = "Chat identifier")
    ),
    responses(
        (status = 200, description = "Chat", body = ChatResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Chat not found")
    )
)]
pub async fn get_chat(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatResponse>, ApiError> {
    let chat = chats::get_chat(state.chats.as_ref(), &claims, &chat_id).await?;
    Ok(Json(chat.into()))
}

/// Post a message into one of the caller's chats.
#[utoipa::path(
    post,
    path = "/v1/chats/{chat_id}/messages",
    tag = "Chats",
    security(("bearer_auth" = [])),
    params(
        ("chat_id" = String, Path, description = "Chat identifier")
    ),
    request_body = PostMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = ChatMessageResponse),
        (status = 400, description = "Empty or oversized message"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Chat not found")
    )
)]
pub async fn post_message(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    ApiJson(request): ApiJson<PostMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageResponse>), ApiError> {
    let message = chats::post_message(state.chats.as_ref(), &claims, &chat_id, request).await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}
