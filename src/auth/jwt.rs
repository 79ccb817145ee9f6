use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

/// Why a token failed verification. All three map to 401; the split exists
/// for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::Malformed,
        }
    }
}

/// Identity claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// HS256 signing and verification keys derived from the configured secret.
/// Constructed per state so tests can run with distinct secrets.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let cfg = &state.config.jwt;
        Self::new(&cfg.secret, Duration::minutes(cfg.ttl_minutes))
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    fn issue_with(&self, user_id: Uuid, email: &str, ttl: Duration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "token issued");
        Ok(token)
    }

    /// Sign a token for the given identity, expiring after the configured ttl.
    pub fn issue(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        self.issue_with(user_id, email, self.ttl)
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        // Expiry is exact: a token is invalid at or after exp.
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret", Duration::minutes(15))
    }

    #[test]
    fn issue_then_verify_returns_the_claims() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, "ann@example.com").expect("issue");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ann@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let keys = keys();
        let token = keys
            .issue_with(Uuid::new_v4(), "a@x.com", Duration::minutes(-1))
            .expect("issue");
        assert_eq!(keys.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn token_from_another_key_fails_with_invalid_signature() {
        let token = JwtKeys::new("secret-a", Duration::minutes(15))
            .issue(Uuid::new_v4(), "a@x.com")
            .expect("issue");
        let other = JwtKeys::new("secret-b", Duration::minutes(15));
        assert_eq!(other.verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_fails_with_invalid_signature_even_if_unexpired() {
        let keys = keys();
        let token = keys.issue(Uuid::new_v4(), "a@x.com").expect("issue");
        let parts: Vec<&str> = token.split('.').collect();

        let payload = Base64UrlUnpadded::decode_vec(parts[1]).expect("decode payload");
        let mut claims: serde_json::Value = serde_json::from_slice(&payload).expect("json");
        claims["email"] = serde_json::Value::String("mallory@x.com".into());
        let forged_payload =
            Base64UrlUnpadded::encode_string(&serde_json::to_vec(&claims).unwrap());

        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert_eq!(keys.verify(&forged), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn flipped_signature_fails_with_invalid_signature() {
        let keys = keys();
        let token = keys.issue(Uuid::new_v4(), "a@x.com").expect("issue");
        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') {
            format!("{head}.B{}", &sig[1..])
        } else {
            format!("{head}.A{}", &sig[1..])
        };
        assert_eq!(keys.verify(&flipped), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn garbage_fails_with_malformed() {
        let keys = keys();
        assert_eq!(keys.verify("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(keys.verify(""), Err(AuthError::Malformed));
        assert_eq!(keys.verify("a.b"), Err(AuthError::Malformed));
    }
}
