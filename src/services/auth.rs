//! Authentication service implementation
//!
//! This service resolves bearer credentials into an authenticated user and
//! the permissions that user holds.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::utils::errors::{Result, SecretSantaError};

/// Permission levels for different operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Any authenticated portal user
    User,
    /// HR/portal administrators
    Admin,
}

/// Authentication context for a user
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub permissions: HashSet<Permission>,
}

impl AuthContext {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            permissions: HashSet::from([Permission::User]),
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            permissions: HashSet::from([Permission::User, Permission::Admin]),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_admin(&self) -> bool {
        self.has_permission(Permission::Admin)
    }
}

/// Claims carried by a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

/// Authentication service for bearer tokens and role checks
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            config,
        }
    }

    /// Resolve an `Authorization` header value into an authentication context
    pub fn authenticate_header(&self, header: Option<&str>) -> Result<AuthContext> {
        let header = header.ok_or_else(|| SecretSantaError::Authentication("Missing authorization header".to_string()))?;
        let token = bearer_token(header)
            .ok_or_else(|| SecretSantaError::Authentication("Authorization header must be a bearer token".to_string()))?;
        self.authenticate(token)
    }

    /// Verify a bearer token and build the caller's context
    pub fn authenticate(&self, token: &str) -> Result<AuthContext> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            SecretSantaError::Authentication("Invalid or expired token".to_string())
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| SecretSantaError::Authentication("Token subject is not a user id".to_string()))?;

        let roles = data.claims.roles.iter().chain(data.claims.role.iter());
        Ok(self.context_for(user_id, roles))
    }

    /// Build a context from a user id and the roles asserted for it
    pub fn context_for<'a>(&self, user_id: Uuid, roles: impl IntoIterator<Item = &'a String>) -> AuthContext {
        let is_admin = self.config.admin_user_ids.contains(&user_id)
            || roles.into_iter().any(|role| role == &self.config.admin_role);

        let context = if is_admin { AuthContext::admin(user_id) } else { AuthContext::user(user_id) };
        debug!(user_id = %user_id, permissions = ?context.permissions, "Authentication context created");
        context
    }

    /// Require specific permission or return error
    pub fn require_permission(&self, context: &AuthContext, required: Permission) -> Result<()> {
        if !context.has_permission(required) {
            warn!(user_id = %context.user_id, required = ?required, "Permission check failed");
            return Err(SecretSantaError::PermissionDenied(format!(
                "User {} lacks required permission: {:?}",
                context.user_id, required
            )));
        }

        Ok(())
    }

    /// Sign a token for a user; used by operators and tests
    pub fn issue_token(&self, user_id: Uuid, roles: &[&str], ttl: chrono::Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            role: None,
            aud: self.config.audience.clone(),
            exp: (now + ttl).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SecretSantaError::Authentication(format!("Failed to issue token: {}", e)))
    }
}

/// Extract the token from a `Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
