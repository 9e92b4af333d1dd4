use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tokio::task;
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::is_valid_email, extract::ActiveUser},
    error::{ApiError, ApiResult},
    state::AppState,
    users::{
        dto::{CreateUserRequest, ListParams, PublicUser, UpdateUserRequest},
        repo::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id", put(update_user))
        .route("/users/:id", delete(delete_user))
}

#[instrument(skip(state, _caller))]
pub async fn list_users(
    State(state): State<AppState>,
    _caller: ActiveUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<PublicUser>>> {
    let users = User::list(&state.db, params.skip, params.limit).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, _caller, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    _caller: ActiveUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }
    if User::email_exists(&state.db, &payload.email).await? {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hasher = state.hasher.clone();
    let password = payload.password;
    let hash = task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    let user = User::insert(&state.db, &payload.email, &payload.name, &hash).await?;
    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, _caller))]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: ActiveUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, _caller, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    _caller: ActiveUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<PublicUser>> {
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    // A changed email must not collide with another account.
    if payload.email != user.email && User::email_exists(&state.db, &payload.email).await? {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let new_hash = match payload.password.filter(|p| !p.is_empty()) {
        Some(password) => {
            if password.len() < 8 {
                return Err(ApiError::Validation("Password too short".into()));
            }
            let hasher = state.hasher.clone();
            let hash = task::spawn_blocking(move || hasher.hash(&password))
                .await
                .map_err(|e| ApiError::Internal(e.into()))??;
            Some(hash)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        id,
        &payload.email,
        &payload.name,
        new_hash.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = id, "user updated");
    Ok(Json(updated.into()))
}

#[instrument(skip(state, _caller))]
pub async fn delete_user(
    State(state): State<AppState>,
    _caller: ActiveUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User"));
    }
    info!(user_id = id, "user deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
