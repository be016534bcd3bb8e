use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};

/// Unique identifier for batches (server-assigned, opaque)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub String);

impl BatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle status of a batch. Exactly two states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Active,
    Archived,
}

impl BatchStatus {
    /// Wire value used in query strings and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Active => "active",
            BatchStatus::Archived => "archived",
        }
    }

    /// Badge label
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Active => "Active",
            BatchStatus::Archived => "Archived",
        }
    }

    /// The other state (archive <-> unarchive)
    pub fn toggled(&self) -> Self {
        match self {
            BatchStatus::Active => BatchStatus::Archived,
            BatchStatus::Archived => BatchStatus::Active,
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchStatus {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(BatchStatus::Active),
            "archived" => Ok(BatchStatus::Archived),
            other => Err(CoachError::invalid_input(
                "status",
                format!("expected 'active' or 'archived', got '{}'", other),
            )),
        }
    }
}

/// Teacher assigned to a batch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// What to show in the teacher avatar slot
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Avatar {
    /// Teacher has a picture URL
    Picture(String),
    /// Uppercased first letter of the name, or the default letter
    Initial(char),
}

impl Teacher {
    /// Letter shown when the teacher has neither picture nor name
    pub const DEFAULT_INITIAL: char = 'T';

    /// Label shown when the teacher has no name
    pub const FALLBACK_NAME: &'static str = "Teacher";

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(Self::FALLBACK_NAME)
    }

    pub fn avatar(&self) -> Avatar {
        if let Some(picture) = self.picture.as_deref().filter(|p| !p.trim().is_empty()) {
            return Avatar::Picture(picture.to_string());
        }

        let initial = self
            .name
            .as_deref()
            .and_then(|name| name.trim().chars().next())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or(Self::DEFAULT_INITIAL);

        Avatar::Initial(initial)
    }
}

/// A named sub-group of a coaching (class section)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: BatchId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<Teacher>,
    /// Days of the week the batch meets
    #[serde(default)]
    pub days: Vec<Weekday>,
    /// Start time as "HH:MM" (24h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub note_count: u32,
    #[serde(default)]
    pub notice_count: u32,
}

impl Batch {
    /// Whether a schedule line should be shown at all
    pub fn has_schedule(&self) -> bool {
        !self.days.is_empty()
            || self
                .start_time
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }

    /// Pre-formatted schedule, e.g. "Mon, Wed · 10:00 AM"
    pub fn schedule_label(&self) -> Option<String> {
        if !self.has_schedule() {
            return None;
        }

        let days = self
            .days
            .iter()
            .map(|day| day.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let time = self
            .start_time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(format_start_time);

        Some(match (days.is_empty(), time) {
            (false, Some(time)) => format!("{} · {}", days, time),
            (false, None) => days,
            (true, Some(time)) => time,
            (true, None) => String::new(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == BatchStatus::Active
    }
}

/// "14:30" -> "2:30 PM"; anything unparseable is shown verbatim
fn format_start_time(raw: &str) -> String {
    match NaiveTime::parse_from_str(raw, "%H:%M") {
        Ok(time) => time.format("%-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Payload for creating a batch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBatch {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub days: Vec<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl NewBatch {
    /// Check the draft before it is sent anywhere
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoachError::invalid_input("name", "must not be empty"));
        }

        if let Some(time) = self.start_time.as_deref() {
            if NaiveTime::parse_from_str(time.trim(), "%H:%M").is_err() {
                return Err(CoachError::invalid_input(
                    "start time",
                    format!("'{}' is not HH:MM", time),
                ));
            }
        }

        Ok(())
    }

    /// Parse "mon, wed,Fri" into weekdays
    pub fn parse_days(input: &str) -> Result<Vec<Weekday>> {
        let mut days = Vec::new();

        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let day = part.parse::<Weekday>().map_err(|_| {
                CoachError::invalid_input("days", format!("'{}' is not a weekday", part))
            })?;
            if !days.contains(&day) {
                days.push(day);
            }
        }

        Ok(days)
    }

    /// Materialize as an active batch with zeroed counters
    pub fn into_batch(self, id: BatchId) -> Batch {
        Batch {
            id,
            name: self.name.trim().to_string(),
            subject: self
                .subject
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status: BatchStatus::Active,
            teacher: None,
            days: self.days,
            start_time: self.start_time.map(|t| t.trim().to_string()),
            member_count: 0,
            note_count: 0,
            notice_count: 0,
        }
    }
}

/// Caller's role within a coaching
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoachingRole {
    Admin,
    Teacher,
    Student,
    #[serde(other)]
    Unknown,
}

impl FromStr for CoachingRole {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(CoachingRole::Admin),
            "TEACHER" => Ok(CoachingRole::Teacher),
            "STUDENT" => Ok(CoachingRole::Student),
            other => Err(CoachError::invalid_input(
                "role",
                format!("unknown coaching role '{}'", other),
            )),
        }
    }
}

/// Coaching the screen is scoped to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingContext {
    pub id: String,
    pub owner_id: String,
    /// Caller's role in this coaching, if the caller is a member at all
    #[serde(default)]
    pub role: Option<CoachingRole>,
}

/// The signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub id: String,
}
