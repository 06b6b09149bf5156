//! Workspace-scoped event operations. Permission checks happen in the
//! handler layer before any of these run; everything here assumes the
//! caller is already authorized.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::models::event::{Event, EventResponse};
use crate::store::{EventFilter, EventStore, NewEvent};
use crate::utils::error::AppError;
use crate::validation::ValidatedEventFields;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_PAGE_NUMBER: i64 = 1;

/// Optional narrowing criteria for the list operation.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub attendees: Option<Vec<Uuid>>,
    pub keyword: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page_size: i64,
    pub page_number: i64,
}

impl PageRequest {
    pub fn new(page_size: Option<i64>, page_number: Option<i64>) -> Result<Self, AppError> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let page_number = page_number.unwrap_or(DEFAULT_PAGE_NUMBER);

        if page_size < 1 {
            return Err(AppError::validation("pageSize", "Page size must be at least 1"));
        }
        if page_number < 1 {
            return Err(AppError::validation(
                "pageNumber",
                "Page number must be at least 1",
            ));
        }

        Ok(Self {
            page_size,
            page_number,
        })
    }

    pub fn skip(&self) -> i64 {
        (self.page_number - 1) * self.page_size
    }
}

/// Pagination envelope returned alongside a page of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_size: i64,
    pub page_number: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub skip: i64,
}

#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Stores a new event owned by the workspace, stamped with the
    /// authenticated caller. Always inserts; duplicates are allowed.
    pub async fn create(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        fields: ValidatedEventFields,
    ) -> Result<Event, AppError> {
        self.store
            .insert(NewEvent {
                workspace_id,
                created_by: user_id,
                fields,
            })
            .await
    }

    /// Replaces the editable fields of an event in place. The write
    /// matches id and workspace in one atomic store call; a zero-row
    /// match is classified afterwards so callers can tell a missing
    /// event apart from one owned by another workspace.
    pub async fn update(
        &self,
        workspace_id: Uuid,
        event_id: Uuid,
        fields: ValidatedEventFields,
    ) -> Result<Event, AppError> {
        if let Some(updated) = self
            .store
            .update_scoped(workspace_id, event_id, fields)
            .await?
        {
            return Ok(updated);
        }

        match self.store.find_by_id(event_id).await? {
            None => Err(AppError::NotFound("Event not found.".to_string())),
            Some(event) if event.workspace_id != workspace_id => Err(AppError::OwnershipMismatch(
                "Event does not belong to this workspace".to_string(),
            )),
            // The event matched both id and workspace on the probe yet the
            // write touched nothing; only a concurrent change can cause this.
            Some(_) => Err(AppError::UpdateFailed("Failed to update event".to_string())),
        }
    }

    /// One page of the workspace's events, newest first, with attendees
    /// expanded to partial profiles. The page fetch and the total count
    /// run concurrently; the pair is not a consistent snapshot.
    pub async fn list(
        &self,
        workspace_id: Uuid,
        filters: ListFilters,
        page: PageRequest,
    ) -> Result<(Vec<EventResponse>, Pagination), AppError> {
        let filter = EventFilter {
            workspace_id,
            attendees: filters.attendees,
            keyword: filters.keyword,
            date: filters.date,
        };
        let skip = page.skip();

        let (events, total_count) = tokio::join!(
            self.store.find_page(&filter, skip, page.page_size),
            self.store.count(&filter),
        );
        let events = events?;
        let total_count = total_count?;

        let mut responses = Vec::with_capacity(events.len());
        for event in events {
            let attendees = self.store.expand_attendees(&event.attendees).await?;
            responses.push(EventResponse::from_event(event, attendees));
        }

        let total_pages = (total_count + page.page_size - 1) / page.page_size;
        let pagination = Pagination {
            page_size: page.page_size,
            page_number: page.page_number,
            total_count,
            total_pages,
            skip,
        };

        Ok((responses, pagination))
    }

    /// Fetches one event matching both id and workspace, attendees
    /// expanded. A wrong-workspace id reads as not found.
    pub async fn get_by_id(
        &self,
        workspace_id: Uuid,
        event_id: Uuid,
    ) -> Result<EventResponse, AppError> {
        let event = self
            .store
            .find_scoped(workspace_id, event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found.".to_string()))?;

        let attendees = self.store.expand_attendees(&event.attendees).await?;
        Ok(EventResponse::from_event(event, attendees))
    }

    /// Removes one event matching both id and workspace in a single
    /// atomic store call.
    pub async fn delete(&self, workspace_id: Uuid, event_id: Uuid) -> Result<(), AppError> {
        if self.store.delete_scoped(workspace_id, event_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(
                "Event not found or does not belong to the specified workspace".to_string(),
            ))
        }
    }
}
