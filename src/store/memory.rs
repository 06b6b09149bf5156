//! In-memory store and member directory used by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::event::Event;
use crate::models::member::Role;
use crate::models::user::AttendeeProfile;
use crate::store::{EventFilter, EventStore, MemberDirectory, NewEvent};
use crate::utils::error::AppError;
use crate::validation::ValidatedEventFields;

pub struct MemoryEventStore {
    events: Mutex<Vec<Event>>,
    users: Mutex<HashMap<Uuid, AttendeeProfile>>,
    // Monotonic clock so creation order is unambiguous in tests.
    ticks: AtomicI64,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            users: Mutex::new(HashMap::new()),
            ticks: AtomicI64::new(0),
        }
    }

    pub fn add_user(&self, profile: AttendeeProfile) {
        self.users.lock().unwrap().insert(profile.id, profile);
    }

    pub fn snapshot(&self, event_id: Uuid) -> Option<Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
    }

    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        DateTime::from_timestamp(1_700_000_000 + tick, 0).unwrap()
    }

    fn matches(event: &Event, filter: &EventFilter) -> bool {
        if event.workspace_id != filter.workspace_id {
            return false;
        }
        if let Some(attendees) = &filter.attendees {
            if !event.attendees.iter().any(|a| attendees.contains(a)) {
                return false;
            }
        }
        if let Some(keyword) = &filter.keyword {
            if !event
                .title
                .to_lowercase()
                .contains(&keyword.to_lowercase())
            {
                return false;
            }
        }
        if let Some(date) = &filter.date {
            if event.date != *date {
                return false;
            }
        }
        true
    }

    fn apply(event: &mut Event, fields: ValidatedEventFields, updated_at: DateTime<Utc>) {
        event.title = fields.title;
        event.agenda = fields.agenda;
        event.date = fields.date;
        event.time = fields.time;
        event.duration = fields.duration;
        event.attendees = fields.attendees;
        event.meeting_link = fields.meeting_link;
        event.updated_at = updated_at;
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn insert(&self, event: NewEvent) -> Result<Event, AppError> {
        let now = self.now();
        let created = Event {
            id: Uuid::new_v4(),
            workspace_id: event.workspace_id,
            created_by: event.created_by,
            title: event.fields.title,
            agenda: event.fields.agenda,
            date: event.fields.date,
            time: event.fields.time,
            duration: event.fields.duration,
            attendees: event.fields.attendees,
            meeting_link: event.fields.meeting_link,
            created_at: now,
            updated_at: now,
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, event_id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.snapshot(event_id))
    }

    async fn find_scoped(
        &self,
        workspace_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Event>, AppError> {
        Ok(self
            .snapshot(event_id)
            .filter(|e| e.workspace_id == workspace_id))
    }

    async fn find_page(
        &self,
        filter: &EventFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Event>, AppError> {
        let mut matching: Vec<Event> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| Self::matches(e, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &EventFilter) -> Result<i64, AppError> {
        let total = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| Self::matches(e, filter))
            .count();
        Ok(total as i64)
    }

    async fn update_scoped(
        &self,
        workspace_id: Uuid,
        event_id: Uuid,
        fields: ValidatedEventFields,
    ) -> Result<Option<Event>, AppError> {
        let updated_at = self.now();
        let mut events = self.events.lock().unwrap();
        match events
            .iter_mut()
            .find(|e| e.id == event_id && e.workspace_id == workspace_id)
        {
            Some(event) => {
                Self::apply(event, fields, updated_at);
                Ok(Some(event.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_scoped(&self, workspace_id: Uuid, event_id: Uuid) -> Result<bool, AppError> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| !(e.id == event_id && e.workspace_id == workspace_id));
        Ok(events.len() < before)
    }

    async fn expand_attendees(&self, ids: &[Uuid]) -> Result<Vec<AttendeeProfile>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

pub struct MemoryMemberDirectory {
    roles: Mutex<HashMap<(Uuid, Uuid), Role>>,
}

impl MemoryMemberDirectory {
    pub fn new() -> Self {
        Self {
            roles: Mutex::new(HashMap::new()),
        }
    }

    pub fn grant(&self, user_id: Uuid, workspace_id: Uuid, role: Role) {
        self.roles
            .lock()
            .unwrap()
            .insert((user_id, workspace_id), role);
    }
}

#[async_trait]
impl MemberDirectory for MemoryMemberDirectory {
    async fn role_of(&self, user_id: Uuid, workspace_id: Uuid) -> Result<Role, AppError> {
        self.roles
            .lock()
            .unwrap()
            .get(&(user_id, workspace_id))
            .copied()
            .ok_or_else(|| {
                AppError::Forbidden("You are not a member of this workspace".to_string())
            })
    }
}
