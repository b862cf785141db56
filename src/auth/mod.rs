use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::Scope;

/// Claims carried by a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub tenant_id: String,
    pub store_id: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(scope: &Scope, ttl_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            tenant_id: scope.tenant_id.to_string(),
            store_id: scope.store_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours as i64)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must have the form '<scheme> <token>'")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is missing the {0} claim")]
    MissingClaim(&'static str),

    #[error("Token claim {0} is not a UUID")]
    InvalidClaim(&'static str),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Resolve the caller scope from a raw Authorization header value.
///
/// The header must split into exactly two whitespace separated parts. The
/// scheme word is not inspected and the token signature is not verified:
/// claims are read as presented.
pub fn read_scope(header: Option<&str>) -> Result<Scope, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;

    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(AuthError::MalformedHeader);
    }

    decode_scope(parts[1])
}

/// Decode a token payload into a scope without checking signature, expiry or audience
pub fn decode_scope(token: &str) -> Result<Scope, AuthError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_aud = false;

    let data = decode::<Map<String, Value>>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    let tenant_id = uuid_claim(&data.claims, "tenant_id")?;
    let store_id = uuid_claim(&data.claims, "store_id")?;

    Ok(Scope::new(tenant_id, store_id))
}

fn uuid_claim(claims: &Map<String, Value>, name: &'static str) -> Result<Uuid, AuthError> {
    let value = claims
        .get(name)
        .and_then(Value::as_str)
        .ok_or(AuthError::MissingClaim(name))?;
    Uuid::parse_str(value).map_err(|_| AuthError::InvalidClaim(name))
}

/// Mint a signed development token for the given scope
pub fn issue_token(scope: &Scope, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let claims = Claims::new(scope, security.token_ttl_hours);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}
