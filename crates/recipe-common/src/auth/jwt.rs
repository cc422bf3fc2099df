//! JWT issuing and validation
//!
//! Access and refresh tokens are stateless HS256 JWTs. The subject is the
//! user id; the role claim is informational, services re-check the stored
//! role before privileged actions.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use recipe_core::{Snowflake, UserRole};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
}

impl Claims {
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtService {
    /// Expiry values are in seconds
    pub fn new(secret: &str, access_token_expiry: i64, refresh_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    pub fn generate_token_pair(&self, user_id: Snowflake, role: UserRole) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.encode_token(user_id, role, TokenType::Access)?,
            refresh_token: self.encode_token(user_id, role, TokenType::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn encode_token(&self, user_id: Snowflake, role: UserRole, token_type: TokenType) -> Result<String, AppError> {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => self.access_token_expiry,
            TokenType::Refresh => self.refresh_token_expiry,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(lifetime)).timestamp(),
            token_type,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_expecting(token, TokenType::Access)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_expecting(token, TokenType::Refresh)
    }

    fn decode_expecting(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if claims.token_type == expected {
            Ok(claims)
        } else {
            Err(AppError::InvalidToken)
        }
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish_non_exhaustive()
    }
}
