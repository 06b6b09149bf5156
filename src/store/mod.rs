//! Persistence seam for events and workspace membership. The service
//! layer only sees these traits; the Postgres implementation lives in
//! [`postgres`] and tests run against an in-memory double.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::event::Event;
use crate::models::member::Role;
use crate::models::user::AttendeeProfile;
use crate::utils::error::AppError;
use crate::validation::ValidatedEventFields;

pub mod postgres;

#[cfg(test)]
pub mod memory;

/// Fields for a brand-new event. `workspace_id` and `created_by` come
/// from the request context, never from the payload.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub workspace_id: Uuid,
    pub created_by: Uuid,
    pub fields: ValidatedEventFields,
}

/// Workspace-scoped listing filter. All narrowing criteria are optional;
/// the workspace restriction is not.
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub workspace_id: Uuid,
    /// Matches events whose attendee set intersects this set.
    pub attendees: Option<Vec<Uuid>>,
    /// Case-insensitive substring match on the title.
    pub keyword: Option<String>,
    /// Exact match on the stored date string.
    pub date: Option<String>,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: NewEvent) -> Result<Event, AppError>;

    /// Looks an event up by id alone, ignoring workspace scope. Used only
    /// to tell a missing event apart from one owned by another workspace.
    async fn find_by_id(&self, event_id: Uuid) -> Result<Option<Event>, AppError>;

    async fn find_scoped(
        &self,
        workspace_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Event>, AppError>;

    /// One page of matching events, newest first.
    async fn find_page(
        &self,
        filter: &EventFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Event>, AppError>;

    async fn count(&self, filter: &EventFilter) -> Result<i64, AppError>;

    /// Atomic find-and-update matching both id and workspace. Returns
    /// `None` when no document matched; the caller decides how to report
    /// that.
    async fn update_scoped(
        &self,
        workspace_id: Uuid,
        event_id: Uuid,
        fields: ValidatedEventFields,
    ) -> Result<Option<Event>, AppError>;

    /// Atomic find-and-delete matching both id and workspace. Returns
    /// whether a document was removed.
    async fn delete_scoped(&self, workspace_id: Uuid, event_id: Uuid) -> Result<bool, AppError>;

    /// Resolves attendee ids to partial profiles, preserving the input
    /// order. Unknown ids are dropped.
    async fn expand_attendees(&self, ids: &[Uuid]) -> Result<Vec<AttendeeProfile>, AppError>;
}

/// Membership lookup for the permission check. Injected alongside the
/// event store so handlers carry no hidden module-level state.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// The caller's role within a workspace; `Forbidden` when the caller
    /// is not a member.
    async fn role_of(&self, user_id: Uuid, workspace_id: Uuid) -> Result<Role, AppError>;
}
