//! Category constants, the default seed set, and name/color checks.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a category name in characters.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 120;

/// Length of a `#RRGGBB` color string.
pub const CATEGORY_COLOR_LENGTH: usize = 7;

/// A shared category that must always exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCategory {
    pub name: &'static str,
    pub color: &'static str,
}

/// The shared default categories, synchronized by name.
pub const DEFAULT_CATEGORIES: &[DefaultCategory] = &[
    DefaultCategory {
        name: "Random Thoughts",
        color: "#EF9C66",
    },
    DefaultCategory {
        name: "School",
        color: "#FCDC94",
    },
    DefaultCategory {
        name: "Personal",
        color: "#78ABA8",
    },
];

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Whether `color` is a `#RRGGBB` hex string.
pub fn is_hex_color(color: &str) -> bool {
    color.len() == CATEGORY_COLOR_LENGTH
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
