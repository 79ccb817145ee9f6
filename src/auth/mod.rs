use axum::Router;

use crate::state::AppState;

mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
mod repo;
mod service;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
