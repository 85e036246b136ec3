use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type NoteId = u64;

/// Durable key holding the serialized note collection.
pub const NOTES_KEY: &str = "notes";
/// Ephemeral key holding the session record.
pub const USER_DATA_KEY: &str = "user_data";
/// File name offered for exports.
pub const EXPORT_FILE_NAME: &str = "notes.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Creation time, never changes.
    pub date: DateTime<Utc>,
    pub changed_at: DateTime<Utc>,
}

/// Session-scoped record. Fields written by other widget versions are carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub last_note_id: Option<NoteId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Which screen is active. `Detail` holds a weak reference: the id must be
/// looked up in the repository every time it is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    List,
    Detail(NoteId),
}

impl ViewState {
    pub fn note_id(&self) -> Option<NoteId> {
        match self {
            ViewState::List => None,
            ViewState::Detail(id) => Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_note_uses_camel_case_keys() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let note = Note {
            id: 1,
            title: "Groceries".into(),
            content: String::new(),
            date: at,
            changed_at: at,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["changedAt"], "2024-03-01T12:00:00Z");
        assert!(json.get("changed_at").is_none());
    }

    #[test]
    fn test_user_data_keeps_unknown_fields() {
        let raw = r#"{"lastNoteId":4,"theme":"dark"}"#;
        let mut data: UserData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.last_note_id, Some(4));

        data.last_note_id = None;
        let out = serde_json::to_value(&data).unwrap();
        assert_eq!(out["theme"], "dark");
        assert!(out["lastNoteId"].is_null());
    }

    #[test]
    fn test_user_data_missing_pointer() {
        let data: UserData = serde_json::from_str("{}").unwrap();
        assert_eq!(data.last_note_id, None);
    }
}
