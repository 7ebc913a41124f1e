//! Category label resolution.

use super::responses::MenuCategory;

/// Language tag whose localized label overrides the default one
pub const PREFERRED_LANGUAGE: &str = "en";

/// Resolve the display label of a category.
///
/// Starts from `category_display_text` (empty when absent). The first
/// `category_display_text_v1` entry tagged [`PREFERRED_LANGUAGE`] replaces it;
/// if that entry has no `display_text` the default is kept. Later entries are
/// never consulted, even when the first English entry is unusable.
pub fn resolve_label(category: &MenuCategory) -> String {
    let default = category.category_display_text.clone().unwrap_or_default();

    let english = category
        .category_display_text_v1
        .iter()
        .flatten()
        .find(|entry| entry.language.as_deref() == Some(PREFERRED_LANGUAGE));

    match english.and_then(|entry| entry.display_text.clone()) {
        Some(localized) => localized,
        None => default,
    }
}
