use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user's id, set by the upstream gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's roles as a comma separated list
pub const USER_ROLES_HEADER: &str = "x-user-roles";

/// Role required to read cocktail trends
pub const ADMIN_ROLE: &str = "Admin";

/// Caller identity resolved by the authenticating gateway
///
/// Token validation happens upstream; this extractor only reads the forwarded
/// headers and rejects requests without a usable user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

impl CallerIdentity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        let roles = parts
            .headers
            .get(USER_ROLES_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { user_id, roles })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}

/// Caller identity that holds the admin role
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub CallerIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = CallerIdentity::from_parts(parts)?;

        if !identity.has_role(ADMIN_ROLE) {
            tracing::warn!(user_id = %identity.user_id, "Admin role required");
            return Err(AppError::Forbidden);
        }

        Ok(AdminIdentity(identity))
    }
}
