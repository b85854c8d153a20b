use serde::{Deserialize, Serialize};

use crate::collection::{Collection, RecordId};
use crate::error::SyncError;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub id: RecordId,
    pub content: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct NewNote {
    content: String,
}

impl NewNote {
    pub fn new(content: &str) -> Result<Self, SyncError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(SyncError::invalid_input("Please enter a note."));
        }
        Ok(Self {
            content: content.to_string(),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

pub struct ShoppingNotes;

impl Collection for ShoppingNotes {
    type Record = Note;
    type Draft = NewNote;

    const NAME: &'static str = "shopping_notes";
    // Served outside the /backend prefix.
    const LIST_PATH: &'static str = "/get_notes";
    const SEARCH_PATH: Option<&'static str> = None;
    const CREATE_PATH: &'static str = "/backend/add_note";
    const CREATED_ID_FIELD: &'static str = "note_id";
    const DELETE_PATH: &'static str = "/backend/delete_note";
    const DELETE_ID_PARAM: &'static str = "note_id";
    const DELETE_SENDS_USER: bool = false;

    const LIST_FAILED: &'static str = "Failed to fetch notes";
    const CREATE_FAILED: &'static str = "Failed to add note";
    const DELETE_FAILED: &'static str = "Failed to delete note";

    fn record_id(record: &Note) -> RecordId {
        record.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_note_content() {
        let note = NewNote::new("  bread and butter \n").unwrap();
        assert_eq!(note.content(), "bread and butter");
        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            json!({"content": "bread and butter"})
        );
    }

    #[test]
    fn rejects_blank_notes() {
        assert!(NewNote::new("   ").is_err());
    }
}
