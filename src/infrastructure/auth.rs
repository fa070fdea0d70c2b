use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::env;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::domain::permissions::NOT_AUTHENTICATED;
use crate::domain::{Actor, DomainError};
use crate::infrastructure::AppState;
use crate::models::user;

const INVALID_TOKEN: &str = "Invalid or expired token.";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub exp: usize,
}

/// The authenticated caller, resolved from the bearer token to a stored user.
/// Endpoints that also accept anonymous callers take
/// `Result<CurrentUser, DomainError>` and decide what a rejection means.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.0.id,
            is_staff: self.0.is_staff,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = DomainError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| DomainError::Unauthenticated(NOT_AUTHENTICATED.to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            DomainError::Unauthenticated("Invalid Authorization header format.".to_string())
        })?;

        let claims = decode_jwt(token).map_err(|e| {
            tracing::warn!("Rejected token: {}", e);
            DomainError::Unauthenticated(INVALID_TOKEN.to_string())
        })?;

        let user = state
            .user_repo
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Token subject no longer exists: {}", claims.sub);
                DomainError::Unauthenticated(INVALID_TOKEN.to_string())
            })?;

        Ok(CurrentUser(user))
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn get_jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "secret".to_string()
        } else {
            panic!("JWT_SECRET environment variable must be set in production");
        }
    })
}

pub fn create_jwt(username: &str) -> Result<String, String> {
    let secret = get_jwt_secret();
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| "token expiry overflows".to_string())?
        .timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_jwt(token: &str) -> Result<Claims, String> {
    let secret = get_jwt_secret();
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("super_secret_password").expect("Failed to hash password");

        assert_ne!("super_secret_password", hash);
        assert!(verify_password("super_secret_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_jwt_round_trip() {
        let token = create_jwt("test_user").expect("Failed to create JWT");
        let claims = decode_jwt(&token).expect("Failed to verify JWT");
        assert_eq!(claims.sub, "test_user");
        assert!(claims.exp as i64 > Utc::now().timestamp());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_jwt("not.a.token").is_err());
    }
}
