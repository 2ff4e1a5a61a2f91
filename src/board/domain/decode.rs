//! Strict decoding of loosely-structured task payloads.
//!
//! Remote endpoints disagree on field names (`assignee_id`, `assigneeId`,
//! `assigned_to`), identifier types (string or integer) and envelopes (bare
//! list or `{"data": [...]}`). Decoding is total over that variation: every
//! modelled field is looked up under its known aliases and becomes `None` when
//! absent or of the wrong type. A list element that is not an object or has
//! no usable id is dropped with a warning so the rest of the list survives.
//! Only a payload that is not a record list as a whole is reported, as
//! [`MalformedDataError`].

use super::{ActorId, MalformedDataError, ProjectId, TaskId, TaskRecord};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use tracing::warn;

const ENVELOPE_KEYS: &[&str] = &["data", "tasks", "items", "results"];

const ID_KEYS: &[&str] = &["id", "task_id", "taskId"];
const TITLE_KEYS: &[&str] = &["title", "name", "task_name", "taskName"];
const STATUS_KEYS: &[&str] = &["status", "state"];
const PRIORITY_KEYS: &[&str] = &["priority"];
const ASSIGNEE_KEYS: &[&str] = &["assignee_id", "assigneeId", "assigned_to", "assignedTo"];
const PROJECT_KEYS: &[&str] = &["project_id", "projectId"];
const HOURS_KEYS: &[&str] = &["estimated_hours", "estimatedHours"];
const START_KEYS: &[&str] = &["start_date", "startDate"];
const DUE_KEYS: &[&str] = &["due_date", "dueDate"];
const DESCRIPTION_KEYS: &[&str] = &["description"];

/// Decodes a JSON text payload into task records.
///
/// # Errors
///
/// Returns [`MalformedDataError`] when the text is not JSON or does not have
/// the shape of a record list.
pub fn decode_task_list(payload: &str) -> Result<Vec<TaskRecord>, MalformedDataError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|err| MalformedDataError::InvalidJson(err.to_string()))?;
    decode_task_list_value(&value)
}

/// Decodes a parsed JSON value into task records.
///
/// Accepts a bare array or an object wrapping the array under `data`,
/// `tasks`, `items` or `results`. Elements that cannot be decoded are
/// skipped and logged with their index.
///
/// # Errors
///
/// Returns [`MalformedDataError`] when the value is not a record list.
pub fn decode_task_list_value(value: &Value) -> Result<Vec<TaskRecord>, MalformedDataError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(envelope) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| envelope.get(*key).and_then(Value::as_array))
            .ok_or(MalformedDataError::NotARecordList {
                found: "an object without a record list",
            })?,
        other => {
            return Err(MalformedDataError::NotARecordList {
                found: json_type(other),
            });
        }
    };

    let records = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match decode_indexed(index, item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(index, error = %err, "skipping undecodable task record");
                None
            }
        })
        .collect();
    Ok(records)
}

/// Decodes a single JSON text record.
///
/// # Errors
///
/// Returns [`MalformedDataError`] when the text is not a JSON object with a
/// usable id. An envelope `{"data": {...}}` is unwrapped.
pub fn decode_task(payload: &str) -> Result<TaskRecord, MalformedDataError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|err| MalformedDataError::InvalidJson(err.to_string()))?;
    let record = value
        .get("data")
        .filter(|inner| inner.is_object())
        .unwrap_or(&value);
    decode_indexed(0, record)
}

fn decode_indexed(index: usize, item: &Value) -> Result<TaskRecord, MalformedDataError> {
    let Value::Object(fields) = item else {
        return Err(MalformedDataError::RecordNotObject {
            index,
            found: json_type(item),
        });
    };

    let id = lookup(fields, ID_KEYS)
        .and_then(identifier_text)
        .and_then(|text| TaskId::new(text).ok())
        .ok_or(MalformedDataError::MissingId { index })?;
    let title = lookup(fields, TITLE_KEYS)
        .and_then(Value::as_str)
        .unwrap_or_default();

    let mut record = TaskRecord::new(id, title);
    if let Some(status) = lookup(fields, STATUS_KEYS).and_then(Value::as_str) {
        record = record.with_status(status);
    }
    if let Some(priority) = lookup(fields, PRIORITY_KEYS).and_then(identifier_text) {
        record = record.with_priority(priority);
    }
    if let Some(assignee) = lookup(fields, ASSIGNEE_KEYS)
        .and_then(identifier_text)
        .and_then(|text| ActorId::new(text).ok())
    {
        record = record.with_assignee(assignee);
    }
    if let Some(project) = lookup(fields, PROJECT_KEYS)
        .and_then(identifier_text)
        .and_then(|text| ProjectId::new(text).ok())
    {
        record = record.with_project(project);
    }
    if let Some(hours) = lookup(fields, HOURS_KEYS).and_then(hours_value) {
        record = record.with_estimated_hours(hours);
    }
    if let Some(start) = lookup(fields, START_KEYS).and_then(date_value) {
        record = record.with_start_date(start);
    }
    if let Some(due) = lookup(fields, DUE_KEYS).and_then(date_value) {
        record = record.with_due_date(due);
    }
    if let Some(description) = lookup(fields, DESCRIPTION_KEYS).and_then(Value::as_str) {
        record = record.with_description(description);
    }

    for (key, value) in fields {
        if !is_modelled_key(key) {
            record = record.with_extra(key.clone(), value.clone());
        }
    }
    Ok(record)
}

fn lookup<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| fields.get(*key).filter(|value| !value.is_null()))
}

fn is_modelled_key(key: &str) -> bool {
    [
        ID_KEYS,
        TITLE_KEYS,
        STATUS_KEYS,
        PRIORITY_KEYS,
        ASSIGNEE_KEYS,
        PROJECT_KEYS,
        HOURS_KEYS,
        START_KEYS,
        DUE_KEYS,
        DESCRIPTION_KEYS,
    ]
    .iter()
    .any(|aliases| aliases.contains(&key))
}

/// Renders string or integer identifiers as text.
fn identifier_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(number.to_string()),
        _ => None,
    }
}

fn hours_value(value: &Value) -> Option<f64> {
    let hours = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (hours.is_finite() && hours >= 0.0).then_some(hours)
}

fn date_value(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
