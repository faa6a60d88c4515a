//! Bearer-token verification.
//!
//! Credentials are issued by the external identity provider; this module only
//! validates the HS256 signature on incoming tokens and resolves the calling
//! user by email. There is no login or refresh endpoint here.

use crate::db::schema::User;
use crate::error::ApiError;
use crate::AppState;
use at_core::Role;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| ApiError::Auth(format!("invalid token: {}", e)))
}

/// Verified caller. Extracting this enforces authentication on a handler.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Auth("missing authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Auth("expected a bearer token".to_string()))?;

        let claims = verify_token(token, &state.config.jwt_secret)?;

        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND is_active = TRUE",
        )
        .bind(&claims.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::Auth("no active account for this token".to_string()))?;

        let role = user
            .role
            .parse::<Role>()
            .map_err(|_| ApiError::Auth("account has an unknown role".to_string()))?;

        Ok(AuthUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role,
        })
    }
}

/// Verified caller with the ADMIN role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(ApiError::Forbidden("administrator role required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(email: &str, secret: &str, exp: usize) -> String {
        let claims = Claims {
            sub: "test-subject".to_string(),
            email: email.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> usize {
        4102444800 // 2100-01-01
    }

    #[test]
    fn test_roundtrip() {
        let token = token_for("ada@example.com", "s3cret", far_future());
        let claims = verify_token(&token, "s3cret").unwrap();
        assert_eq!(claims.email, "ada@example.com");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = token_for("ada@example.com", "s3cret", far_future());
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = token_for("ada@example.com", "s3cret", 1000);
        assert!(verify_token(&token, "s3cret").is_err());
    }
}
