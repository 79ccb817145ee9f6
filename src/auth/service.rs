use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use super::dto::{PublicUser, SigninRequest, SignupRequest};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo::User;
use crate::error::{is_unique_violation, ApiError};
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn require(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("Missing {field}")));
    }
    Ok(())
}

/// Create an account: validate, reject a taken email, hash, persist.
/// Returns only the public identity, never the hash.
pub async fn signup(state: &AppState, mut payload: SignupRequest) -> Result<PublicUser, ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    require(&payload.name, "name")?;
    require(&payload.password, "password")?;
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "signup with existing email");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;

    let user = match User::create(&state.db, &payload.name, &payload.email, &hash).await {
        Ok(user) => user,
        // A concurrent signup can win the race between the pre-check and the
        // insert; the store constraint turns that into the same rejection.
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %payload.email, "signup lost uniqueness race");
            return Err(ApiError::DuplicateEmail);
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, "user created");
    Ok(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    })
}

/// Authenticate and issue a bearer token. An unknown email and a wrong
/// password produce the identical generic failure.
pub async fn signin(state: &AppState, mut payload: SigninRequest) -> Result<String, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        warn!("signin with unknown email");
        return Err(ApiError::AuthenticationFailed);
    };

    let matches = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(user_id = %user.id, error = %e, "password verification errored");
        ApiError::Internal(e)
    })?;
    if !matches {
        warn!(user_id = %user.id, "signin with wrong password");
        return Err(ApiError::AuthenticationFailed);
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.issue(user.id, &user.email)?;
    info!(user_id = %user.id, "user signed in");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_ordinary_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last-name_1@sub.domain.co"));
    }

    #[test]
    fn email_validation_rejects_junk() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("spaces in@x.com"));
    }

    #[test]
    fn blank_fields_fail_validation() {
        assert!(require("", "name").is_err());
        assert!(require("   ", "password").is_err());
        assert!(require("Ann", "name").is_ok());
    }
}
