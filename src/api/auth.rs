// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login. These are the only unauthenticated `/v1` routes.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{ApiError, ApiJson},
    models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    services::accounts,
    state::AppState,
};

/// Create an account with the `user` role.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid email, password or name"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = accounts::register(state.users.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange email and password for a session token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token", body = TokenResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = accounts::login(state.users.as_ref(), &state.issuer, request).await?;
    Ok(Json(issued.into()))
}
