//! Category model and DTOs.

use jotter_core::types::{DbId, Timestamp};
use jotter_core::validation::validate_hex_color;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
///
/// `owner_id` is `None` for shared categories.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub color: String,
    pub is_default: bool,
    pub owner_id: Option<DbId>,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub updated_at: Timestamp,
}

impl Category {
    pub fn is_shared(&self) -> bool {
        self.owner_id.is_none()
    }

    /// Whether `user_id` may see and assign this category.
    pub fn is_visible_to(&self, user_id: DbId) -> bool {
        self.owner_id.is_none_or(|owner| owner == user_id)
    }
}

/// DTO for creating a private category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(
        min = 1,
        max = 120,
        message = "Name must be between 1 and 120 characters."
    ))]
    pub name: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: String,
}

impl CreateCategory {
    /// Trim surrounding whitespace from every field.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            color: self.color.trim().to_string(),
        }
    }
}

/// DTO for updating a private category. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(
        min = 1,
        max = 120,
        message = "Name must be between 1 and 120 characters."
    ))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

impl UpdateCategory {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            color: self.color.map(|c| c.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(owner_id: Option<DbId>) -> Category {
        Category {
            id: 1,
            name: "Work".into(),
            color: "#112233".into(),
            is_default: false,
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn shared_category_is_visible_to_everyone() {
        let c = category(None);
        assert!(c.is_shared());
        assert!(c.is_visible_to(1));
        assert!(c.is_visible_to(2));
    }

    #[test]
    fn private_category_is_visible_to_owner_only() {
        let c = category(Some(1));
        assert!(c.is_visible_to(1));
        assert!(!c.is_visible_to(2));
    }

    #[test]
    fn serialized_shape_has_no_timestamps() {
        let json = serde_json::to_value(category(Some(3))).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["color", "id", "is_default", "name", "owner_id"]);
    }

    #[test]
    fn create_dto_is_validated_after_trimming() {
        let input = CreateCategory {
            name: "   ".into(),
            color: " #112233 ".into(),
        }
        .normalized();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(!fields.contains_key("color"));
    }

    #[test]
    fn update_dto_skips_omitted_fields() {
        assert!(UpdateCategory::default().validate().is_ok());
        let bad = UpdateCategory {
            name: None,
            color: Some("blue".into()),
        };
        assert!(bad.validate().is_err());
    }
}
