//! Authentication Module
//!
//! The original dashboard delegated identity to a hosted auth
//! provider; this service keeps the same shape with a thin JWT session
//! layer. A single configured admin identity signs in with email +
//! password and receives a bearer token; the middleware validates that
//! token on every protected route.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Placeholder secret used when SAPLING_JWT_SECRET is unset.
const INSECURE_DEFAULT_SECRET: &str = "INSECURE_DEFAULT_SECRET_CHANGE_IN_PRODUCTION";

// ============================================================================
// JWT SECRET (TYPE-SAFE)
// ============================================================================

/// Type-safe JWT secret that prevents accidental logging.
#[derive(Clone)]
pub struct JwtSecret(SecretString);

impl JwtSecret {
    /// Create a new JWT secret. Rejects the empty string.
    pub fn new(secret: String) -> ApiResult<Self> {
        if secret.is_empty() {
            return Err(ApiError::invalid_input("jwt secret must not be empty"));
        }
        Ok(Self(SecretString::new(secret.into())))
    }

    /// Expose the secret value (only for cryptographic operations).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Check if the secret is the insecure default.
    pub fn is_insecure_default(&self) -> bool {
        self.0.expose_secret() == INSECURE_DEFAULT_SECRET
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "JwtSecret([REDACTED, {} chars])",
            self.0.expose_secret().len()
        )
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: JwtSecret,
    pub admin_email: String,
    pub admin_password: SecretString,
    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,
}

impl AuthConfig {
    /// Create AuthConfig from environment variables.
    ///
    /// - `SAPLING_JWT_SECRET`: token signing secret (insecure default
    ///   with a warning if unset)
    /// - `SAPLING_ADMIN_EMAIL` / `SAPLING_ADMIN_PASSWORD`: the single
    ///   admin identity
    /// - `SAPLING_TOKEN_TTL_SECS`: token lifetime (default 86400)
    pub fn from_env() -> Self {
        let secret = std::env::var("SAPLING_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "SAPLING_JWT_SECRET not set - using insecure default. \
                 Set a real secret before exposing this service."
            );
            INSECURE_DEFAULT_SECRET.to_string()
        });
        // Non-empty by construction.
        let jwt_secret = JwtSecret(SecretString::new(secret.into()));

        let admin_email =
            std::env::var("SAPLING_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());
        let admin_password = SecretString::new(
            std::env::var("SAPLING_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin".to_string())
                .into(),
        );

        let token_ttl_secs = std::env::var("SAPLING_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400);

        Self {
            jwt_secret,
            admin_email,
            admin_password,
            token_ttl_secs,
        }
    }

    /// Refuse to start in production with the placeholder secret.
    pub fn validate_for_production(&self) -> ApiResult<()> {
        if self.jwt_secret.is_insecure_default() {
            return Err(ApiError::invalid_input(
                "SAPLING_JWT_SECRET is the insecure default; set a real secret in production",
            ));
        }
        Ok(())
    }

    /// Check a login attempt against the configured admin identity.
    pub fn verify_credentials(&self, email: &str, password: &str) -> bool {
        email == self.admin_email && password == self.admin_password.expose_secret()
    }
}

// ============================================================================
// CLAIMS AND TOKENS
// ============================================================================

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated email address.
    pub sub: String,
    /// Issued-at, Unix epoch seconds.
    pub iat: i64,
    /// Expiry, Unix epoch seconds.
    pub exp: i64,
}

/// Authenticated identity injected into request extensions by the
/// auth middleware.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AuthContext {
    pub email: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self { email: claims.sub }
    }
}

/// Issue a session token for an authenticated email.
pub fn generate_token(config: &AuthConfig, email: &str) -> ApiResult<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: email.to_string(),
        iat: now,
        exp: now + config.token_ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.expose().as_bytes()),
    )
    .map_err(|e| ApiError::internal_error(format!("Failed to sign token: {}", e)))
}

/// Validate a bearer token and return its claims.
pub fn validate_token(config: &AuthConfig, token: &str) -> ApiResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.expose().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::token_expired(),
        _ => ApiError::invalid_token(format!("Invalid token: {}", e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn test_config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: JwtSecret::new(secret.to_string()).unwrap(),
            admin_email: "keeper@nursery.test".to_string(),
            admin_password: SecretString::new("grow".to_string().into()),
            token_ttl_secs: 3600,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config("test-secret");
        let token = generate_token(&config, "keeper@nursery.test").unwrap();
        let claims = validate_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "keeper@nursery.test");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let config = test_config("secret-a");
        let other = test_config("secret-b");
        let token = generate_token(&config, "keeper@nursery.test").unwrap();
        let err = validate_token(&other, &token).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = test_config("test-secret");
        assert!(validate_token(&config, "not-a-token").is_err());
    }

    #[test]
    fn test_verify_credentials() {
        let config = test_config("test-secret");
        assert!(config.verify_credentials("keeper@nursery.test", "grow"));
        assert!(!config.verify_credentials("keeper@nursery.test", "wrong"));
        assert!(!config.verify_credentials("other@nursery.test", "grow"));
    }

    #[test]
    fn test_jwt_secret_rejects_empty() {
        assert!(JwtSecret::new(String::new()).is_err());
    }

    #[test]
    fn test_jwt_secret_debug_is_redacted() {
        let secret = JwtSecret::new("super-secret".to_string()).unwrap();
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
