use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Partial user record used when expanding event attendees. Credential
/// fields are never part of this shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeProfile {
    pub id: Uuid,
    pub name: String,
    pub profile_picture: Option<String>,
}
