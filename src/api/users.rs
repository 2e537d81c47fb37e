// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};

use crate::{
    auth::Auth, error::ApiError, models::UserMeResponse, services::accounts, state::AppState,
};

/// Get the current authenticated user's information.
///
/// Returns the identity and roles carried by the session token, plus the
/// display name of the stored account.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token, or account deleted"),
    )
)]
pub async fn get_current_user(
    Auth(claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserMeResponse>, ApiError> {
    let user = accounts::current_user(state.users.as_ref(), &claims).await?;
    Ok(Json(UserMeResponse::new(claims, user)))
}
