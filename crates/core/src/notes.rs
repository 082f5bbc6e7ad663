//! Note text normalization and limits.

/// Maximum length of a note title in characters.
pub const MAX_NOTE_TITLE_LENGTH: usize = 180;

/// Strip surrounding whitespace. Empty results are valid.
pub fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}

/// Normalize a field that may have been omitted.
///
/// `None` stays `None` (leave the stored value alone); `Some("   ")` becomes
/// `Some("")`, which is a real update to an empty value.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|v| normalize_text(&v))
}
