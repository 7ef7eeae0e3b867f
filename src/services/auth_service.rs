//! Authentication service - Verifies bearer tokens.
//!
//! Tokens are issued by the external identity provider and signed
//! with the shared HS256 secret; this service only checks them.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::Caller;
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Identity the request acts as.
    pub fn caller(&self) -> Caller {
        Caller::from_role(self.sub, &self.role)
    }
}

/// Authentication service trait for dependency injection.
pub trait AuthService: Send + Sync {
    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// HS256 token verifier
pub struct Authenticator {
    decoding_key: DecodingKey,
}

impl Authenticator {
    pub fn new(config: &Config) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret_bytes()),
        }
    }
}

impl AuthService for Authenticator {
    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}
