//! Pure validation of untrusted request input. Every check runs before
//! the store is touched; failures carry field-level messages.

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::utils::error::{AppError, FieldError};

const TITLE_MAX_LEN: usize = 255;

/// Request body for both create and update. The two operations share one
/// schema so the field rules cannot drift apart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: String,
    pub agenda: Option<String>,
    pub date: String,
    pub time: String,
    pub duration: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    pub meeting_link: String,
}

/// Well-formed event fields, produced only by [`validate_event_payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEventFields {
    pub title: String,
    pub agenda: Option<String>,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub attendees: Vec<Uuid>,
    pub meeting_link: String,
}

pub fn validate_event_payload(payload: &EventPayload) -> Result<ValidatedEventFields, AppError> {
    let mut errors = Vec::new();

    let title = payload.title.trim().to_string();
    if title.is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    } else if title.chars().count() > TITLE_MAX_LEN {
        errors.push(FieldError::new(
            "title",
            format!("Title must be at most {TITLE_MAX_LEN} characters"),
        ));
    }

    let agenda = payload
        .agenda
        .as_deref()
        .map(str::trim)
        .map(str::to_string);

    let date = payload.date.trim().to_string();
    if date.is_empty() {
        errors.push(FieldError::new("date", "Date is required"));
    }

    let time = payload.time.trim().to_string();
    if time.is_empty() {
        errors.push(FieldError::new("time", "Time is required"));
    }

    let duration = payload.duration.trim().to_string();
    if duration.is_empty() {
        errors.push(FieldError::new("duration", "Duration is required"));
    }

    let mut attendees = Vec::with_capacity(payload.attendees.len());
    for (index, raw) in payload.attendees.iter().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            errors.push(FieldError::new(
                format!("attendees[{index}]"),
                "Attendee id must not be empty",
            ));
            continue;
        }
        match trimmed.parse::<Uuid>() {
            Ok(id) => attendees.push(id),
            Err(_) => errors.push(FieldError::new(
                format!("attendees[{index}]"),
                "Attendee id is not a valid identifier",
            )),
        }
    }

    let meeting_link = payload.meeting_link.trim().to_string();
    if meeting_link.is_empty() {
        errors.push(FieldError::new("meetingLink", "Meeting link is required"));
    } else if Url::parse(&meeting_link).is_err() {
        errors.push(FieldError::new(
            "meetingLink",
            "Meeting link must be a valid URL",
        ));
    }

    if !errors.is_empty() {
        return Err(AppError::ValidationError(errors));
    }

    Ok(ValidatedEventFields {
        title,
        agenda,
        date,
        time,
        duration,
        attendees,
        meeting_link,
    })
}

/// Parses an identifier supplied in a path segment.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(field, "Identifier is required"));
    }
    trimmed
        .parse::<Uuid>()
        .map_err(|_| AppError::validation(field, "Identifier is not valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> EventPayload {
        EventPayload {
            title: "  Sprint planning  ".to_string(),
            agenda: Some("  Review backlog  ".to_string()),
            date: "2025-06-01".to_string(),
            time: "10:00".to_string(),
            duration: "30".to_string(),
            attendees: vec![Uuid::new_v4().to_string()],
            meeting_link: "https://meet.example/abc".to_string(),
        }
    }

    #[test]
    fn trims_title_and_agenda() {
        let fields = validate_event_payload(&payload()).unwrap();
        assert_eq!(fields.title, "Sprint planning");
        assert_eq!(fields.agenda.as_deref(), Some("Review backlog"));
    }

    #[test]
    fn rejects_blank_title() {
        let mut p = payload();
        p.title = "   ".to_string();
        let err = validate_event_payload(&p).unwrap_err();
        let AppError::ValidationError(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "title");
    }

    #[test]
    fn rejects_overlong_title() {
        let mut p = payload();
        p.title = "x".repeat(TITLE_MAX_LEN + 1);
        assert!(validate_event_payload(&p).is_err());

        p.title = "x".repeat(TITLE_MAX_LEN);
        assert!(validate_event_payload(&p).is_ok());
    }

    #[test]
    fn agenda_is_optional() {
        let mut p = payload();
        p.agenda = None;
        let fields = validate_event_payload(&p).unwrap();
        assert_eq!(fields.agenda, None);
    }

    #[test]
    fn rejects_missing_date_time_and_duration() {
        let mut p = payload();
        p.date = String::new();
        p.time = " ".to_string();
        p.duration = String::new();
        let AppError::ValidationError(fields) = validate_event_payload(&p).unwrap_err() else {
            panic!("expected validation error");
        };
        let named: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(named, vec!["date", "time", "duration"]);
    }

    #[test]
    fn rejects_malformed_meeting_link() {
        let mut p = payload();
        p.meeting_link = "not a url".to_string();
        let AppError::ValidationError(fields) = validate_event_payload(&p).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "meetingLink");
    }

    #[test]
    fn rejects_malformed_attendee_ids_with_position() {
        let mut p = payload();
        p.attendees = vec![Uuid::new_v4().to_string(), "nope".to_string()];
        let AppError::ValidationError(fields) = validate_event_payload(&p).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "attendees[1]");
    }

    #[test]
    fn attendees_may_be_empty() {
        let mut p = payload();
        p.attendees = Vec::new();
        let fields = validate_event_payload(&p).unwrap();
        assert!(fields.attendees.is_empty());
    }

    #[test]
    fn parse_id_rejects_blank_and_garbage() {
        assert!(parse_id("workspaceId", "  ").is_err());
        assert!(parse_id("workspaceId", "abc").is_err());

        let id = Uuid::new_v4();
        assert_eq!(parse_id("workspaceId", &id.to_string()).unwrap(), id);
    }
}
