//! Category list extraction.

use super::labels::resolve_label;
use super::responses::MenuData;

/// Resolved labels of every category, in document order.
///
/// Categories whose label resolves to an empty string are skipped.
pub fn category_labels(data: &MenuData) -> Vec<String> {
    data.categories()
        .map(resolve_label)
        .filter(|label| !label.is_empty())
        .collect()
}
