//! Authentication utilities
//!
//! Provides:
//! - JWT token generation and validation
//! - Bearer token extraction
//! - Argon2id password hashing and verification

use crate::errors::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated admin identity attached to protected requests
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: Uuid,
    pub username: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (admin ID)
    pub sub: String,

    /// Admin username
    pub username: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Generate a new JWT token for an admin
    pub fn issue_token(&self, admin_id: Uuid, username: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = JwtClaims {
            sub: admin_id.to_string(),
            username: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal {
                message: format!("Failed to generate token: {}", e),
            })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::ExpiredToken
                    }
                    _ => AppError::InvalidToken,
                }
            })
    }

    /// Resolve a validated token into an admin identity
    pub fn identity_from_token(&self, token: &str) -> Result<AdminIdentity> {
        let claims = self.validate_token(token)?;
        let admin_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        Ok(AdminIdentity {
            admin_id,
            username: claims.username,
        })
    }
}

/// Extract a bearer token from an Authorization header value
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Hash a password with Argon2id (non-blocking)
///
/// Offloads CPU-intensive hashing to the blocking thread pool so the
/// runtime is not starved under concurrent load.
pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal {
                message: format!("Failed to hash password: {}", e),
            })
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("Password hash task panicked: {}", e),
    })?
}

/// Verify a password against a stored Argon2id hash (non-blocking)
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash).map_err(|e| AppError::Internal {
            message: format!("Stored password hash is malformed: {}", e),
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("Password verify task panicked: {}", e),
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test_secret", 3600);

        let admin_id = Uuid::new_v4();
        let token = manager.issue_token(admin_id, "editor").unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, admin_id.to_string());
        assert_eq!(claims.username, "editor");
        assert!(claims.exp - claims.iat == 3600);
    }

    #[test]
    fn test_identity_from_token() {
        let manager = JwtManager::new("test_secret", 3600);

        let admin_id = Uuid::new_v4();
        let token = manager.issue_token(admin_id, "editor").unwrap();
        let identity = manager.identity_from_token(&token).unwrap();

        assert_eq!(identity.admin_id, admin_id);
        assert_eq!(identity.username, "editor");
    }

    #[test]
    fn test_token_signed_with_other_key_rejected() {
        let manager = JwtManager::new("test_secret", 3600);
        let other = JwtManager::new("other_secret", 3600);

        let token = other.issue_token(Uuid::new_v4(), "editor").unwrap();
        let err = manager.validate_token(&token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new("test_secret", 3600);

        // Craft a token whose expiry is well past the validation leeway
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: Uuid::new_v4().to_string(),
            username: "editor".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret"),
        )
        .unwrap();

        let err = manager.validate_token(&token).unwrap_err();
        assert!(matches!(err, AppError::ExpiredToken));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("abc.def.ghi"), None);
        assert_eq!(extract_bearer("Basic abc"), None);
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("correct horse".to_string()).await.unwrap();

        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong horse".to_string(), hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_password_hashes_are_salted() {
        let hash1 = hash_password("same password".to_string()).await.unwrap();
        let hash2 = hash_password("same password".to_string()).await.unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same password".to_string(), hash1).await.unwrap());
        assert!(verify_password("same password".to_string(), hash2).await.unwrap());
    }
}
