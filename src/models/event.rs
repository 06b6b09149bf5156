use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::AttendeeProfile;

/// A scheduled meeting inside a workspace. `workspace_id` and `created_by`
/// are set at creation and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub agenda: Option<String>,
    /// Opaque date string as submitted by the client (e.g. `2025-06-01`).
    pub date: String,
    /// Opaque time string as submitted by the client (e.g. `10:00`).
    pub time: String,
    /// Duration in minutes, kept as text.
    pub duration: String,
    pub attendees: Vec<Uuid>,
    pub meeting_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-side shape of an event with attendee ids expanded to partial
/// user profiles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub agenda: Option<String>,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub attendees: Vec<AttendeeProfile>,
    pub meeting_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn from_event(event: Event, attendees: Vec<AttendeeProfile>) -> Self {
        Self {
            id: event.id,
            workspace_id: event.workspace_id,
            created_by: event.created_by,
            title: event.title,
            agenda: event.agenda,
            date: event.date,
            time: event.time,
            duration: event.duration,
            attendees,
            meeting_link: event.meeting_link,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}
