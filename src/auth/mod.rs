use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
