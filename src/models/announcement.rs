use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Validated fields for a create or a full replace.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementInput {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Todos los campos son obligatorios")]
    MissingField,
    #[error("Formato de fecha inválido")]
    InvalidDate,
    #[error("ID es requerido")]
    MissingId,
}

/// Body of POST /announcements and PUT /announcements/{id}.
///
/// Fields are kept loosely typed so that presence and type problems both
/// surface as a 400 with the contract message instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct AnnouncementPayload {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub date: Option<Value>,
}

impl AnnouncementPayload {
    pub fn validate(&self) -> Result<AnnouncementInput, ValidationError> {
        let title = text_field(self.title.as_ref());
        let description = text_field(self.description.as_ref());
        let date = self.date.as_ref().filter(|v| !is_falsy(v));

        let (Some(title), Some(description), Some(date)) = (title, description, date) else {
            return Err(ValidationError::MissingField);
        };

        let date = date_field(date).ok_or(ValidationError::InvalidDate)?;

        Ok(AnnouncementInput {
            title,
            description,
            date,
        })
    }
}

/// Body of DELETE /announcements.
#[derive(Debug, Default, Deserialize)]
pub struct DeletePayload {
    pub id: Option<Value>,
}

impl DeletePayload {
    /// `Ok(None)` means an id was given but it cannot name any row.
    pub fn target(&self) -> Result<Option<i64>, ValidationError> {
        let id = self
            .id
            .as_ref()
            .filter(|v| !is_falsy(v))
            .ok_or(ValidationError::MissingId)?;
        Ok(row_id(id))
    }
}

/// Interpret a path or body value as a row id.
pub fn row_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        v @ (Value::Number(_) | Value::Bool(true)) if !is_falsy(v) => Some(v.to_string()),
        _ => None,
    }
}

fn date_field(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse the date formats the notice-board front end sends. Values without
/// an offset are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
