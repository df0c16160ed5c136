//! Task records.
//!
//! A task is one to-do entry: text, completion flag, creation timestamp and an
//! optional due date/time. Records serialize with camelCase keys so the stored
//! document reads `{"id","text","completed","createdAt","dueDate","dueTime"}`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Maximum task text length, in characters, after trimming
pub const MAX_TEXT_LEN: usize = 200;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    #[serde(default, with = "due_time_format")]
    pub due_time: Option<NaiveTime>,
}

impl TaskRecord {
    /// Build a record from already-validated parts
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
        due_date: Option<NaiveDate>,
        due_time: Option<NaiveTime>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            created_at,
            due_date,
            due_time: due_time.map(truncate_to_minute),
        }
    }

    /// The moment this task becomes overdue, in local wall-clock time.
    ///
    /// Timed tasks are due at that exact minute; date-only tasks are due at
    /// the very end of the day. A time without a date has no deadline.
    pub fn deadline(&self) -> Option<NaiveDateTime> {
        let date = self.due_date?;
        Some(match self.due_time {
            Some(time) => date.and_time(time),
            None => date.and_time(end_of_day()),
        })
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Trim and validate task text
pub fn normalize_text(raw: &str) -> Result<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Error::EmptyText);
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(Error::TooLong { len });
    }
    Ok(text.to_string())
}

/// Generate a fresh task id (lower-case ULID)
pub fn generate_task_id() -> String {
    Ulid::new().to_string().to_ascii_lowercase()
}

/// Parse a due date from `YYYY-MM-DD`, `today` or `tomorrow`
pub fn parse_due_date(value: &str, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        _ => {}
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        Error::InvalidArgument(format!(
            "invalid date '{trimmed}' (expected YYYY-MM-DD, today or tomorrow)"
        ))
    })
}

/// Parse a due time from `HH:MM`. `HH:MM:SS` is accepted; seconds are dropped.
pub fn parse_due_time(value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    let time = NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, TIME_FORMAT_SECONDS))
        .map_err(|_| {
            Error::InvalidArgument(format!("invalid time '{trimmed}' (expected HH:MM)"))
        })?;
    Ok(truncate_to_minute(time))
}

/// Drop seconds and sub-seconds; due times are stored as `HH:MM`
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

pub fn format_due_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// `dueTime` is stored as `HH:MM`, matching what a time input produces.
mod due_time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&super::format_due_time(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_due_time(value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
