use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config_loader;
use crates::domain::value_objects::enums::user_roles::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// The authenticated principal attached to every protected request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: {}", self.0),
        )
            .into_response()
    }
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub fn generate_token(user_id: Uuid, role: Role) -> anyhow::Result<String> {
    let jwt = config_loader::get_jwt_secret()?;

    let exp = Utc::now()
        .checked_add_signed(Duration::days(jwt.expiry_days))
        .ok_or_else(|| anyhow::anyhow!("Failed to compute token expiry"))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn validate_token(token: &str) -> Result<Claims, AuthError> {
    let jwt = config_loader::get_jwt_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load JWT secret: {}", e))?;

    let decoding_key = DecodingKey::from_secret(jwt.secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Bearer header first; WebSocket clients may pass ?token= instead.
        let token = match parts.headers.get(axum::http::header::AUTHORIZATION) {
            Some(auth_header) => {
                let auth_str = auth_header.to_str().map_err(|_| {
                    (
                        StatusCode::UNAUTHORIZED,
                        "Invalid Authorization header".to_string(),
                    )
                })?;

                let Some(token) = auth_str.strip_prefix("Bearer ") else {
                    return Err((
                        StatusCode::UNAUTHORIZED,
                        "Invalid Authorization header format".to_string(),
                    ));
                };

                token.to_string()
            }
            None => parts
                .uri
                .query()
                .and_then(|query| {
                    query
                        .split('&')
                        .find_map(|pair| pair.strip_prefix("token="))
                })
                .map(|token| token.to_string())
                .ok_or((
                    StatusCode::UNAUTHORIZED,
                    "Missing Authorization header".to_string(),
                ))?,
        };

        let claims = validate_token(&token)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.0.to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid user ID in token".to_string(),
            )
        })?;

        let role = Role::from_str(&claims.role).ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid role in token".to_string(),
        ))?;

        Ok(AuthUser { user_id, role })
    }
}

#[cfg(test)]
mod tests;
