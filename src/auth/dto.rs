use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hint::RequestHint;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for signin.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Public part of a user, the only shape ever returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub message: &'static str,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub request: RequestHint,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub count: usize,
    pub users: Vec<UserListItem>,
}
