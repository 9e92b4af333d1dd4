use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
pub mod extract;
pub mod handlers;
pub mod password;
pub mod token;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
