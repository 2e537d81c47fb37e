// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin API endpoints.
//!
//! - The user grid is open to moderators and admins
//! - Deleting an account requires the Admin role

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{AdminOnly, Auth},
    error::ApiError,
    models::{UserListResponse, UserResponse},
    services::accounts,
    state::AppState,
};

/// List all accounts, oldest first.
#[utoipa::path(
    get,
    path = "/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (moderator required)")
    )
)]
pub async fn list_users(
    Auth(claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users: Vec<UserResponse> = accounts::list_users(state.users.as_ref(), &claims)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    let total = users.len();
    Ok(Json(UserListResponse { users, total }))
}

/// Delete an account together with its chats.
#[utoipa::path(
    delete,
    path = "/v1/admin/users/{user_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "Account to delete")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Admins cannot delete themselves")
    )
)]
pub async fn delete_user(
    AdminOnly(claims): AdminOnly,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    accounts::delete_user(
        state.users.as_ref(),
        state.chats.as_ref(),
        &claims,
        &user_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Principal, SessionClaims};
    use crate::config::AuthSettings;
    use crate::models::RegisterRequest;
    use crate::storage::StoredUser;

    fn test_state() -> AppState {
        AppState::in_memory(
            &AuthSettings::new("admin-api-test-secret-0123456789abcdef", "portal-server").unwrap(),
        )
    }

    fn claims_for(state: &AppState, user: &StoredUser) -> SessionClaims {
        let principal = Principal::new(&user.id, &user.email, user.roles.iter().copied()).unwrap();
        state.issuer.issue(&principal).unwrap().claims
    }

    async fn seed(state: &AppState) -> (StoredUser, StoredUser) {
        let admin = accounts::seed_admin(state.users.as_ref(), "root@example.com", "admin-password")
            .await
            .unwrap();
        let user = accounts::register(
            state.users.as_ref(),
            RegisterRequest {
                email: "ada@example.com".into(),
                password: "hunter2hunter2".into(),
                name: Some("Ada".into()),
            },
        )
        .await
        .unwrap();
        (admin, user)
    }

    #[tokio::test]
    async fn admin_lists_users() {
        let state = test_state();
        let (admin, _) = seed(&state).await;

        let Json(list) = list_users(Auth(claims_for(&state, &admin)), State(state.clone()))
            .await
            .expect("listing succeeds");

        assert_eq!(list.total, 2);
        assert_eq!(list.users[0].email, "root@example.com");
    }

    #[tokio::test]
    async fn plain_user_cannot_list() {
        let state = test_state();
        let (_, user) = seed(&state).await;

        let err = list_users(Auth(claims_for(&state, &user)), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Insufficient permissions");
    }

    #[tokio::test]
    async fn admin_deletes_other_user() {
        let state = test_state();
        let (admin, user) = seed(&state).await;

        let status = delete_user(
            AdminOnly(claims_for(&state, &admin)),
            State(state.clone()),
            Path(user.id.clone()),
        )
        .await
        .expect("deletion succeeds");

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn admin_cannot_delete_self() {
        let state = test_state();
        let (admin, _) = seed(&state).await;

        let err = delete_user(
            AdminOnly(claims_for(&state, &admin)),
            State(state.clone()),
            Path(admin.id.clone()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn deleting_unknown_user_is_not_found() {
        let state = test_state();
        let (admin, _) = seed(&state).await;

        let err = delete_user(
            AdminOnly(claims_for(&state, &admin)),
            State(state),
            Path("missing".into()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
