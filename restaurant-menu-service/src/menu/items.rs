//! Category lookup and item extraction.

use super::labels::resolve_label;
use super::responses::{Item, MenuData};

/// Outcome of looking up one category in a menu document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryLookup {
    /// Items of the first matching category; empty when nothing matched
    pub items: Vec<Item>,

    /// Label of the category that matched, as resolved (untrimmed)
    pub matched: Option<String>,

    /// Every resolved label seen during the walk, in document order
    pub observed: Vec<String>,
}

/// Labels compare equal when they match after trimming and case folding
pub fn labels_match(label: &str, requested: &str) -> bool {
    label.trim().to_lowercase() == requested.trim().to_lowercase()
}

/// Find the items of the category called `category_name`.
///
/// The first matching category across all menu groups wins; same-named
/// categories later in the document are ignored. The walk still visits every
/// category so that `observed` lists all labels for error reporting.
pub fn find_category_items(data: &MenuData, category_name: &str) -> CategoryLookup {
    let mut lookup = CategoryLookup::default();

    for category in data.categories() {
        let label = resolve_label(category);

        if lookup.matched.is_none() && labels_match(&label, category_name) {
            lookup.items = category
                .cat_items
                .iter()
                .flatten()
                .map(Item::from)
                .collect();
            lookup.matched = Some(label.clone());
        }

        // `observed` covers every category, including those after the match
        lookup.observed.push(label);
    }

    lookup
}
