//! Note model and DTOs.

use jotter_core::notes::{normalize_optional, normalize_text};
use jotter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A note row joined with its category's display fields.
#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub edited_at: Timestamp,
    pub user_id: DbId,
    pub category_id: DbId,
    pub category_name: String,
    pub category_color: String,
}

/// The category fields embedded in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteCategory {
    pub id: DbId,
    pub name: String,
    pub color: String,
}

/// A note with its category eagerly attached.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub edited_at: Timestamp,
    pub category: NoteCategory,
    pub user_id: DbId,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            edited_at: row.edited_at,
            category: NoteCategory {
                id: row.category_id,
                name: row.category_name,
                color: row.category_color,
            },
            user_id: row.user_id,
        }
    }
}

/// DTO for creating a note. Title and content default to empty.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateNote {
    #[serde(default)]
    #[validate(length(max = 180, message = "Ensure this field has no more than 180 characters."))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[validate(required(message = "This field is required."))]
    pub category_id: Option<DbId>,
}

impl CreateNote {
    /// Trim title and content; empty results are kept.
    pub fn normalized(self) -> Self {
        Self {
            title: normalize_text(&self.title),
            content: normalize_text(&self.content),
            category_id: self.category_id,
        }
    }
}

/// DTO for patching a note.
///
/// `None` means the field was omitted and stays as stored; `Some("")` is a
/// real update to an empty value.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct UpdateNote {
    #[validate(length(max = 180, message = "Ensure this field has no more than 180 characters."))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<DbId>,
}

impl UpdateNote {
    pub fn normalized(self) -> Self {
        Self {
            title: normalize_optional(self.title),
            content: normalize_optional(self.content),
            category_id: self.category_id,
        }
    }
}

/// Validated input for inserting a note row.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub category_id: DbId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter_core::notes::MAX_NOTE_TITLE_LENGTH;

    #[test]
    fn create_normalization_trims_both_fields() {
        let input = CreateNote {
            title: "  hi  ".into(),
            content: "\n body \t".into(),
            category_id: Some(1),
        }
        .normalized();
        assert_eq!(input.title, "hi");
        assert_eq!(input.content, "body");
    }

    #[test]
    fn missing_category_fails_validation() {
        let errors = CreateNote::default().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category_id"));
    }

    #[test]
    fn create_accepts_empty_title_and_content() {
        let input = CreateNote {
            category_id: Some(1),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn overlong_title_fails_validation() {
        let input = CreateNote {
            title: "x".repeat(MAX_NOTE_TITLE_LENGTH + 1),
            category_id: Some(1),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_normalization_keeps_omitted_fields_omitted() {
        let patch = UpdateNote {
            title: Some("   ".into()),
            content: None,
            category_id: None,
        }
        .normalized();
        assert_eq!(patch.title.as_deref(), Some(""));
        assert_eq!(patch.content, None);
    }

    #[test]
    fn patch_body_distinguishes_omitted_from_blank() {
        let patch: UpdateNote = serde_json::from_str(r#"{"content": ""}"#).unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.content.as_deref(), Some(""));
    }

    #[test]
    fn note_serializes_with_nested_category() {
        let now = chrono::Utc::now();
        let note = Note::from(NoteRow {
            id: 5,
            title: "t".into(),
            content: "c".into(),
            created_at: now,
            edited_at: now,
            user_id: 9,
            category_id: 2,
            category_name: "School".into(),
            category_color: "#FCDC94".into(),
        });
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["category"]["id"], 2);
        assert_eq!(json["category"]["name"], "School");
        assert_eq!(json["user_id"], 9);
        assert!(json["created_at"].is_string());
    }
}
