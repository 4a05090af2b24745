//! Bearer-token authentication
//!
//! Tokens are issued by the identity provider; the service only validates
//! them and turns the claims into a [`Principal`].

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use core_kernel::{Principal, Role, UserId};

use crate::config::ApiConfig;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles; identity-provider groups are accepted too
    #[serde(default, alias = "cognito:groups")]
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// The caller these claims describe
    ///
    /// Unknown roles are ignored; a token without a known role acts as an
    /// athlete of its own journal.
    pub fn principal(&self) -> Result<Principal, AuthError> {
        let user_id = UserId::new(self.sub.as_str()).map_err(|_| AuthError::InvalidSubject)?;
        let mut roles: Vec<Role> = Vec::new();
        for raw in &self.roles {
            match raw.parse::<Role>() {
                Ok(role) if !roles.contains(&role) => roles.push(role),
                Ok(_) => {}
                Err(e) => debug!(role = %raw, error = %e, "Ignoring unknown role"),
            }
        }
        if roles.is_empty() {
            roles.push(Role::Athlete);
        }
        Ok(Principal::new(user_id, roles))
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token subject is not a valid user id")]
    InvalidSubject,
}

/// Signs a token with the shared secret
///
/// Used by tests and local tooling; production tokens come from the
/// identity provider.
pub fn create_token(
    user_id: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs);

    let claims = Claims {
        sub: user_id.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token against the configured secret, issuer and audience
pub fn validate_token(token: &str, config: &ApiConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    if let Some(issuer) = &config.jwt_issuer {
        validation.set_issuer(&[issuer.as_str()]);
    }
    match &config.jwt_audience {
        Some(audience) => validation.set_audience(&[audience.as_str()]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Extracts the token from an `Authorization: Bearer ...` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ApiConfig {
        ApiConfig {
            jwt_secret: "test-secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_token("athlete-1", vec!["coach".to_string()], "test-secret", 60).unwrap();
        let claims = validate_token(&token, &config()).unwrap();
        let principal = claims.principal().unwrap();
        assert_eq!(principal.user_id.as_str(), "athlete-1");
        assert_eq!(principal.roles, vec![Role::Coach]);
    }

    #[test]
    fn test_rejects_wrong_secret_and_expiry() {
        let token = create_token("athlete-1", vec![], "other-secret", 60).unwrap();
        assert!(matches!(validate_token(&token, &config()), Err(AuthError::InvalidToken)));

        let expired = create_token("athlete-1", vec![], "test-secret", -600).unwrap();
        assert!(matches!(validate_token(&expired, &config()), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_group_claim_alias_and_default_role() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "coach-9",
            "cognito:groups": ["Coaches", "observers"],
            "exp": 0
        }))
        .unwrap();
        assert_eq!(claims.principal().unwrap().roles, vec![Role::Coach]);

        let bare = Claims { sub: "a".into(), roles: vec![], exp: 0, iat: 0 };
        assert_eq!(bare.principal().unwrap().roles, vec![Role::Athlete]);
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert!(bearer_token(Some("Basic abc")).is_err());
        assert!(bearer_token(None).is_err());
    }
}
