// ABOUTME: JWT-based user authentication for API requests
// ABOUTME: Mints and validates HS256 bearer tokens carrying the user identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! # Authentication
//!
//! Registration and passwords live with the identity service. This server only
//! verifies HS256 bearer tokens signed with the shared `JWT_SECRET` and turns
//! the `sub` claim into a user id. The admin tool can mint tokens with the
//! same secret for local use.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::constants::service_names;
use crate::errors::{AppError, AppResult};
use pantry_core::models::User;

/// Length in bytes of generated signing secrets
const GENERATED_SECRET_LEN: usize = 64;

/// `JWT` claims for user authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

impl Claims {
    /// Parse the subject as a user id
    ///
    /// # Errors
    ///
    /// Returns an error if `sub` is not a UUID
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))
    }
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct AuthManager {
    secret: Vec<u8>,
    expiry_hours: i64,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("secret", &"[REDACTED]")
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

impl AuthManager {
    /// Create a manager from a raw signing secret
    #[must_use]
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            secret: secret.to_vec(),
            expiry_hours,
        }
    }

    /// Create a manager from configuration, generating a secret when none is set
    ///
    /// # Errors
    ///
    /// Returns an error if the system RNG fails
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        match &config.jwt_secret {
            Some(secret) => Ok(Self::new(secret.as_bytes(), config.jwt_expiry_hours)),
            None => {
                let secret = generate_jwt_secret()?;
                tracing::warn!("Using a generated JWT secret; tokens will not survive a restart");
                Ok(Self::new(&secret, config.jwt_expiry_hours))
            }
        }
    }

    /// Generate a signed token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if token encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            aud: service_names::API_AUDIENCE.to_owned(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns `AUTH_EXPIRED` for expired tokens and `AUTH_INVALID` for any
    /// other signature, audience, or format problem
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[service_names::API_AUDIENCE]);

        decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT token validation failed: {e}");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AppError::auth_expired(),
                    ErrorKind::InvalidSignature => {
                        AppError::auth_invalid("Token signature verification failed")
                    }
                    ErrorKind::InvalidAudience => AppError::auth_invalid("Token audience mismatch"),
                    _ => AppError::auth_invalid(format!("Token validation failed: {e}")),
                }
            })
    }
}

/// Extract a bearer token from the `Authorization` header
///
/// Returns `Ok(None)` when the header is absent.
///
/// # Errors
///
/// Returns an error when the header is present but is not a bearer token
pub fn bearer_token(headers: &HeaderMap) -> AppResult<Option<&str>> {
    let Some(value) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;

    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or_else(|| AppError::auth_invalid("Authorization header must use the Bearer scheme"))
}

/// Generate a random `JWT` secret
///
/// # Errors
///
/// Returns an error if the system RNG fails
pub fn generate_jwt_secret() -> AppResult<[u8; GENERATED_SECRET_LEN]> {
    let mut secret = [0u8; GENERATED_SECRET_LEN];
    rand::rngs::OsRng.try_fill_bytes(&mut secret).map_err(|e| {
        tracing::error!("Failed to generate JWT secret: {e}");
        AppError::internal("System RNG failure - cannot generate JWT secret")
    })?;
    Ok(secret)
}
