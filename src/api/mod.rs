// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_auth, Role},
    models::{
        ChatListResponse, ChatMessageResponse, ChatResponse, ChatSummary, CreateChatRequest,
        LoginRequest, PostMessageRequest, RegisterRequest, TokenResponse, UserListResponse,
        UserMeResponse, UserResponse,
    },
    state::AppState,
    storage::MessageAuthor,
};

pub mod admin;
pub mod auth;
pub mod chats;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Every route below requires a valid bearer token.
    let protected_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{user_id}", delete(admin::delete_user))
        .route("/chats", get(chats::list_chats).post(chats::create_chat))
        .route("/chats/{chat_id}", get(chats::get_chat))
        .route("/chats/{chat_id}/messages", post(chats::post_message))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health/live", get(health::liveness))
        .nest("/v1", public_routes.merge(protected_routes))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        auth::register,
        auth::login,
        users::get_current_user,
        admin::list_users,
        admin::delete_user,
        chats::list_chats,
        chats::create_chat,
        chats::get_chat,
        chats::post_message
    ),
    components(
        schemas(
            Role,
            MessageAuthor,
            health::HealthResponse,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            UserListResponse,
            UserMeResponse,
            CreateChatRequest,
            PostMessageRequest,
            ChatMessageResponse,
            ChatResponse,
            ChatSummary,
            ChatListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness check"),
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Current user"),
        (name = "Admin", description = "User administration"),
        (name = "Chats", description = "Chat threads and messages")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
