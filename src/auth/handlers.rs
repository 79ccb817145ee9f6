use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    SigninRequest, SigninResponse, SignupRequest, SignupResponse, UserListItem, UserListResponse,
};
use super::repo::User;
use super::service;
use crate::error::ApiError;
use crate::hint::RequestHint;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/signup", post(signup))
        .route("/user/signin", post(signin))
        .route("/user", get(list_users))
}

#[instrument(skip_all)]
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let user = service::signup(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully",
            user,
        }),
    ))
}

#[instrument(skip_all)]
async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, ApiError> {
    let token = service::signin(&state, payload).await?;
    Ok(Json(SigninResponse {
        message: "Authentication successful",
        token,
    }))
}

#[instrument(skip_all)]
async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, ApiError> {
    let users = User::list(&state.db).await?;
    let users: Vec<UserListItem> = users
        .into_iter()
        .map(|u| UserListItem {
            request: RequestHint::get(state.config.url(&format!("user/{}", u.id))),
            id: u.id,
            name: u.name,
            email: u.email,
        })
        .collect();
    Ok(Json(UserListResponse {
        count: users.len(),
        users,
    }))
}
