//! Caller identity. Session handling lives in the upstream auth layer,
//! which forwards the authenticated user id in a trusted header; this
//! extractor only reads it back out.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::utils::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, as asserted by the auth layer in front of
/// this service.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| raw.trim().parse::<Uuid>().ok())
            .map(AuthUser)
            .ok_or_else(|| AppError::AuthError("Request is not authenticated".to_string()))
    }
}
