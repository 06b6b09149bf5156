//! Endpoint layer for the event API: parse and validate input, check
//! membership and permission, call the service, shape the response.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::event::{Event, EventResponse};
use crate::permissions::{role_guard, Permission};
use crate::services::{ListFilters, PageRequest, Pagination};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};
use crate::validation::{parse_id, validate_event_payload, EventPayload};

#[derive(Serialize)]
struct EventBody {
    event: Event,
}

#[derive(Serialize)]
struct ExpandedEventBody {
    event: EventResponse,
}

#[derive(Serialize)]
struct EventListBody {
    events: Vec<EventResponse>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    /// Comma-separated attendee ids.
    pub attendees: Option<String>,
    pub keyword: Option<String>,
    pub date: Option<String>,
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
}

fn parse_attendee_filter(raw: Option<&str>) -> Result<Option<Vec<Uuid>>, AppError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut ids = Vec::new();
    for part in raw.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        ids.push(
            trimmed
                .parse::<Uuid>()
                .map_err(|_| AppError::validation("attendees", "Attendee id is not valid"))?,
        );
    }

    Ok(if ids.is_empty() { None } else { Some(ids) })
}

pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(workspace_id): Path<String>,
    Json(payload): Json<EventPayload>,
) -> Result<Response, AppError> {
    let workspace_id = parse_id("workspaceId", &workspace_id)?;
    let fields = validate_event_payload(&payload)?;

    let role = state.members.role_of(user_id, workspace_id).await?;
    role_guard(role, &[Permission::CreateEvent])?;

    let event = state.events.create(workspace_id, user_id, fields).await?;

    Ok(success(EventBody { event }, "Meeting scheduled successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((event_id, workspace_id)): Path<(String, String)>,
    Json(payload): Json<EventPayload>,
) -> Result<Response, AppError> {
    let event_id = parse_id("id", &event_id)?;
    let workspace_id = parse_id("workspaceId", &workspace_id)?;
    let fields = validate_event_payload(&payload)?;

    let role = state.members.role_of(user_id, workspace_id).await?;
    role_guard(role, &[Permission::EditEvent])?;

    let event = state.events.update(workspace_id, event_id, fields).await?;

    Ok(success(EventBody { event }, "Meeting rescheduled successfully"))
}

pub async fn list_events(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(workspace_id): Path<String>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Response, AppError> {
    let workspace_id = parse_id("workspaceId", &workspace_id)?;
    let filters = ListFilters {
        attendees: parse_attendee_filter(query.attendees.as_deref())?,
        keyword: query.keyword.filter(|k| !k.trim().is_empty()),
        date: query.date.filter(|d| !d.trim().is_empty()),
    };
    let page = PageRequest::new(query.page_size, query.page_number)?;

    let role = state.members.role_of(user_id, workspace_id).await?;
    role_guard(role, &[Permission::ViewOnly])?;

    let (events, pagination) = state.events.list(workspace_id, filters, page).await?;

    Ok(success(
        EventListBody { events, pagination },
        "All events fetched successfully",
    ))
}

pub async fn get_event_by_id(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((event_id, workspace_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let event_id = parse_id("id", &event_id)?;
    let workspace_id = parse_id("workspaceId", &workspace_id)?;

    let role = state.members.role_of(user_id, workspace_id).await?;
    role_guard(role, &[Permission::ViewOnly])?;

    let event = state.events.get_by_id(workspace_id, event_id).await?;

    Ok(success(ExpandedEventBody { event }, "Event fetched successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((event_id, workspace_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let event_id = parse_id("id", &event_id)?;
    let workspace_id = parse_id("workspaceId", &workspace_id)?;

    let role = state.members.role_of(user_id, workspace_id).await?;
    role_guard(role, &[Permission::DeleteEvent])?;

    state.events.delete(workspace_id, event_id).await?;

    Ok(empty_success("Meeting cancelled successfully"))
}
