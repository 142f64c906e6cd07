//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs issued by the clinic's login service with the same
//! shared secret. The claims carry the user id and role; patients are
//! identified by `sub`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Role carried in the token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// Clinicians and administrators.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Doctor | Role::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id (the patient id for patients)
    pub sub: i64,
    pub role: Role,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued at, seconds since epoch
    pub iat: i64,
}

/// Signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for a user.
    pub fn issue(&self, user_id: i64, role: Role) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::unauthorized("Token has expired"),
                _ => ApiError::unauthorized("Invalid token"),
            })
    }
}

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn require_patient(&self) -> ApiResult<i64> {
        if self.role == Role::Patient {
            Ok(self.user_id)
        } else {
            Err(ApiError::forbidden("Only patients can do this"))
        }
    }

    pub fn require_staff(&self) -> ApiResult<()> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Staff access required"))
        }
    }

    pub fn require_admin(&self) -> ApiResult<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::forbidden("Admin access required"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer scheme"))?;

        let claims = state.jwt.verify(token.trim())?;
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
