use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tokio::task;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{is_valid_email, LoginRequest, RegisterRequest, TokenResponse},
        extract::ActiveUser,
    },
    error::{ApiError, ApiResult},
    state::AppState,
    users::{dto::PublicUser, repo::User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::email_exists(&state.db, &payload.email).await? {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    // Argon2 is CPU-bound by design; keep it off the async workers.
    let hasher = state.hasher.clone();
    let password = payload.password;
    let hash = task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    let user = User::insert(&state.db, &payload.email, &payload.name, &hash).await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let hasher = state.hasher.clone();
    let password = payload.password;
    let stored_hash = user.hashed_password.clone();
    let ok = task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(user_id = user.id, "login inactive account");
        return Err(ApiError::InactiveAccount);
    }

    let access_token = state.tokens.issue(&user.email)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[instrument(skip_all)]
pub async fn me(ActiveUser(user): ActiveUser) -> Json<PublicUser> {
    Json(user.into())
}
