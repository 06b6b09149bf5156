use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::event::Event;
use crate::models::member::Role;
use crate::models::user::AttendeeProfile;
use crate::store::{EventFilter, EventStore, MemberDirectory, NewEvent};
use crate::utils::error::AppError;
use crate::validation::ValidatedEventFields;

const EVENT_COLUMNS: &str = "id, workspace_id, created_by, title, agenda, \
     date, time, duration, attendees, meeting_link, created_at, updated_at";

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select_filtered<'a>(prefix: &str, filter: &'a EventFilter) -> QueryBuilder<'a, Postgres> {
        let mut qb = QueryBuilder::new(prefix);
        qb.push(" WHERE workspace_id = ");
        qb.push_bind(filter.workspace_id);

        if let Some(attendees) = &filter.attendees {
            qb.push(" AND attendees && ");
            qb.push_bind(attendees.as_slice());
        }
        if let Some(keyword) = &filter.keyword {
            qb.push(" AND title ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(keyword)));
        }
        if let Some(date) = &filter.date {
            qb.push(" AND date = ");
            qb.push_bind(date.as_str());
        }

        qb
    }
}

/// Escapes LIKE metacharacters so a keyword is matched literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert(&self, event: NewEvent) -> Result<Event, AppError> {
        let ValidatedEventFields {
            title,
            agenda,
            date,
            time,
            duration,
            attendees,
            meeting_link,
        } = event.fields;

        let created = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events \
                 (id, workspace_id, created_by, title, agenda, date, time, \
                  duration, attendees, meeting_link) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(event.workspace_id)
        .bind(event.created_by)
        .bind(title)
        .bind(agenda)
        .bind(date)
        .bind(time)
        .bind(duration)
        .bind(attendees)
        .bind(meeting_link)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, event_id: Uuid) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_scoped(
        &self,
        workspace_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND workspace_id = $2"
        ))
        .bind(event_id)
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_page(
        &self,
        filter: &EventFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Event>, AppError> {
        let mut qb =
            Self::select_filtered(&format!("SELECT {EVENT_COLUMNS} FROM events"), filter);
        qb.push(" ORDER BY created_at DESC OFFSET ");
        qb.push_bind(skip);
        qb.push(" LIMIT ");
        qb.push_bind(limit);

        let events = qb
            .build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    async fn count(&self, filter: &EventFilter) -> Result<i64, AppError> {
        let mut qb = Self::select_filtered("SELECT COUNT(*) FROM events", filter);

        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn update_scoped(
        &self,
        workspace_id: Uuid,
        event_id: Uuid,
        fields: ValidatedEventFields,
    ) -> Result<Option<Event>, AppError> {
        let ValidatedEventFields {
            title,
            agenda,
            date,
            time,
            duration,
            attendees,
            meeting_link,
        } = fields;

        // Single statement matching both id and workspace, so the
        // ownership check cannot race a concurrent delete.
        let updated = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET \
                 title = $1, agenda = $2, date = $3, time = $4, \
                 duration = $5, attendees = $6, meeting_link = $7, \
                 updated_at = NOW() \
             WHERE id = $8 AND workspace_id = $9 \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(title)
        .bind(agenda)
        .bind(date)
        .bind(time)
        .bind(duration)
        .bind(attendees)
        .bind(meeting_link)
        .bind(event_id)
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_scoped(&self, workspace_id: Uuid, event_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND workspace_id = $2")
            .bind(event_id)
            .bind(workspace_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn expand_attendees(&self, ids: &[Uuid]) -> Result<Vec<AttendeeProfile>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = sqlx::query_as::<_, AttendeeProfile>(
            "SELECT id, name, profile_picture FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        // Re-order to the stored attendee sequence; ANY() gives no
        // ordering guarantee.
        let ordered = ids
            .iter()
            .filter_map(|id| profiles.iter().find(|p| p.id == *id).cloned())
            .collect();

        Ok(ordered)
    }
}

#[derive(Clone)]
pub struct PgMemberDirectory {
    pool: PgPool,
}

impl PgMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for PgMemberDirectory {
    async fn role_of(&self, user_id: Uuid, workspace_id: Uuid) -> Result<Role, AppError> {
        let role: Option<String> = sqlx::query_scalar(
            "SELECT role FROM workspace_members WHERE user_id = $1 AND workspace_id = $2",
        )
        .bind(user_id)
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?;

        match role {
            Some(raw) => Role::parse(&raw).ok_or_else(|| {
                AppError::InternalServerError(format!("Unknown role '{raw}' in membership table"))
            }),
            None => Err(AppError::Forbidden(
                "You are not a member of this workspace".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralizes_metacharacters() {
        assert_eq!(escape_like("sync"), "sync");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
