use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: String,
    pub image_url: Option<String>,
    pub max_participants: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(id: i64, input: EventInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            date: input.date,
            end_date: input.end_date,
            location: input.location,
            image_url: input.image_url,
            max_participants: input.max_participants,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: EventInput, now: DateTime<Utc>) {
        self.title = input.title;
        self.description = input.description;
        self.date = input.date;
        self.end_date = input.end_date;
        self.location = input.location;
        self.image_url = input.image_url;
        self.max_participants = input.max_participants;
        self.updated_at = now;
    }
}

/// Body of create/update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "deserialize_event_date")]
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_event_date")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub max_participants: Option<i32>,
}

impl EventInput {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidEvent("Title is required".to_string()));
        }

        if let Some(end_date) = self.end_date {
            if end_date < self.date {
                return Err(AppError::InvalidEvent(
                    "End date must not be before start date".to_string(),
                ));
            }
        }

        if matches!(self.max_participants, Some(n) if n <= 0) {
            return Err(AppError::InvalidEvent(
                "Max participants must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Accepts RFC 3339, a form-style local `YYYY-MM-DDTHH:MM[:SS]` or a bare
/// `YYYY-MM-DD`. Values without an offset are taken as UTC.
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_event_date<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

fn deserialize_optional_event_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_event_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid end_date: {}", raw))),
    }
}
