/// Schema check for untrusted note collections (import files).
///
/// All-or-nothing: the first bad record rejects the whole batch and nothing is
/// repaired or coerced.
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::types::Note;
use crate::NotesError;

/// Parse import file text and validate it.
pub fn parse_and_validate(text: &str) -> Result<Vec<Note>, NotesError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| NotesError::Validation(format!("Invalid JSON: {}", e)))?;
    validate(&value)
}

pub fn validate(value: &Value) -> Result<Vec<Note>, NotesError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid("expected an array of notes".to_string()))?;

    let mut notes = Vec::with_capacity(items.len());
    let mut ids = HashSet::new();
    let mut titles = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        let note = validate_record(index, item)?;
        if !ids.insert(note.id) {
            return Err(invalid(format!("note {}: duplicate id {}", index, note.id)));
        }
        if !titles.insert(note.title.clone()) {
            return Err(invalid(format!(
                "note {}: duplicate title '{}'",
                index, note.title
            )));
        }
        notes.push(note);
    }

    Ok(notes)
}

fn validate_record(index: usize, item: &Value) -> Result<Note, NotesError> {
    let record = item
        .as_object()
        .ok_or_else(|| invalid(format!("note {}: not an object", index)))?;

    let id = match record.get("id").and_then(Value::as_u64) {
        Some(id) if id > 0 => id,
        _ => return Err(invalid(format!("note {}: 'id' must be a positive integer", index))),
    };

    let title = string_field(record, "title", index)?;
    if title.trim().is_empty() {
        return Err(invalid(format!("note {}: 'title' is empty", index)));
    }
    let content = string_field(record, "content", index)?;
    let date = timestamp_field(record, "date", index)?;
    let changed_at = timestamp_field(record, "changedAt", index)?;
    if changed_at < date {
        return Err(invalid(format!("note {}: 'changedAt' is before 'date'", index)));
    }

    Ok(Note {
        id,
        title: title.to_string(),
        content: content.to_string(),
        date,
        changed_at,
    })
}

fn string_field<'a>(record: &'a Map<String, Value>, field: &str, index: usize) -> Result<&'a str, NotesError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("note {}: '{}' must be a string", index, field)))
}

fn timestamp_field(
    record: &Map<String, Value>,
    field: &str,
    index: usize,
) -> Result<DateTime<Utc>, NotesError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| invalid(format!("note {}: '{}' is not a valid timestamp", index, field)))
}

fn invalid(detail: String) -> NotesError {
    NotesError::Validation(format!("Invalid notes format: {}", detail))
}
