use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::Role;
use crate::AppState;

use super::auth::{authorize, AuthUser};
use super::error::ApiError;

#[derive(Debug, Serialize)]
pub struct BanResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub users_count: i64,
    pub banned_users: i64,
    pub books_count: i64,
}

/// Ban a user account. Banned accounts keep their row but every
/// authenticated request is rejected from the next request onward.
pub async fn ban_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    admin: AuthUser,
) -> Result<Json<BanResponse>, ApiError> {
    authorize(&admin, Role::Admin)?;

    let target: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_optional(&state.db)
        .await?;
    let (target_id,) = target.ok_or_else(|| ApiError::not_found("User not found"))?;

    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query("UPDATE users SET is_banned = 1, updated_at = ? WHERE id = ?")
        .bind(&now)
        .bind(&target_id)
        .execute(&state.db)
        .await?;

    tracing::info!("Admin {} banned user {}", admin.email, target_id);

    Ok(Json(BanResponse {
        message: "User banned".to_string(),
    }))
}

/// Aggregate counters for the admin dashboard
pub async fn stats(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
) -> Result<Json<StatsResponse>, ApiError> {
    authorize(&admin, Role::Admin)?;

    let (users_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;
    let (banned_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_banned = 1")
        .fetch_one(&state.db)
        .await?;
    let (books_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(StatsResponse {
        users_count,
        banned_users,
        books_count,
    }))
}
