// SPDX-License-Identifier: MIT

//! User CRUD routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{NewUser, User};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", axum::routing::put(update_user).delete(delete_user))
}

/// List all users.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    let users = state.db.get_all_users().await?;
    Ok(Json(users))
}

/// Create a user from a JSON body. Responds 201 with the stored record,
/// including the generated ID.
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.db.insert_user(&body).await?;
    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user record.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<NewUser>,
) -> Result<Json<User>> {
    let user = state
        .db
        .update_user(id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;
    tracing::info!(user_id = user.id, "User updated");
    Ok(Json(user))
}

/// Delete a user record, responding with the removed record.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>> {
    let user = state
        .db
        .delete_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;
    tracing::info!(user_id = user.id, "User deleted");
    Ok(Json(user))
}
